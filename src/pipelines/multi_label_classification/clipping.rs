use std::marker::PhantomData;

use burn::{
    module::{AutodiffModule, Module, ModuleVisitor, ParamId},
    optim::GradientsParams,
    tensor::{backend::AutodiffBackend, ElementConversion, Tensor},
};

/// Sums the squared gradients of every float parameter of a module
struct SquaredNorm<'a, B: AutodiffBackend> {
    grads: &'a GradientsParams,
    total: f64,
    backend: PhantomData<B>,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for SquaredNorm<'_, B> {
    fn visit_float<const D: usize>(&mut self, id: &ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.get::<B::InnerBackend, D>(id) {
            self.total += (grad.clone() * grad).sum().into_scalar().elem::<f64>();
        }
    }
}

/// Multiplies the gradient of every float parameter of a module by a constant
struct Rescale<'a, B: AutodiffBackend> {
    grads: &'a mut GradientsParams,
    scale: f64,
    backend: PhantomData<B>,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for Rescale<'_, B> {
    fn visit_float<const D: usize>(&mut self, id: &ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.remove::<B::InnerBackend, D>(id) {
            self.grads
                .register::<B::InnerBackend, D>(id.clone(), grad.mul_scalar(self.scale));
        }
    }
}

/// The L2 norm of all of a module's gradients taken together
pub fn grad_norm<B, M>(module: &M, grads: &GradientsParams) -> f64
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    let mut visitor = SquaredNorm::<B> {
        grads,
        total: 0.0,
        backend: PhantomData,
    };
    module.visit(&mut visitor);

    visitor.total.sqrt()
}

/// Rescale all gradients so their global L2 norm is at most `max_norm`.
///
/// Returns the clipped gradients along with the norm measured before clipping.
pub fn clip_grad_norm<B, M>(
    module: &M,
    mut grads: GradientsParams,
    max_norm: f64,
) -> (GradientsParams, f64)
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    let norm = grad_norm::<B, M>(module, &grads);

    if norm.is_finite() && norm > max_norm {
        let mut visitor = Rescale::<B> {
            grads: &mut grads,
            scale: max_norm / (norm + 1e-6),
            backend: PhantomData,
        };
        module.visit(&mut visitor);
    }

    (grads, norm)
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{Autodiff, NdArray},
        nn::{Linear, LinearConfig},
        tensor::backend::Backend,
    };

    use super::*;

    type TestBackend = Autodiff<NdArray>;

    #[derive(Module, Debug)]
    struct Pair<B: Backend> {
        first: Linear<B>,
        second: Linear<B>,
    }

    fn grads_for(module: &Pair<TestBackend>, scale: f32) -> GradientsParams {
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::ones([2, 3], &device).mul_scalar(scale);

        let output = module.second.forward(module.first.forward(input));
        let grads = output.sum().backward();

        GradientsParams::from_grads(grads, module)
    }

    fn pair() -> Pair<TestBackend> {
        let device = Default::default();

        Pair {
            first: LinearConfig::new(3, 4).init(&device),
            second: LinearConfig::new(4, 2).init(&device),
        }
    }

    #[test]
    fn large_gradients_are_scaled_down_to_the_ceiling() {
        let module = pair();
        let grads = grads_for(&module, 1000.0);

        let before = grad_norm::<TestBackend, _>(&module, &grads);
        assert!(before > 1.0);

        let (clipped, measured) = clip_grad_norm::<TestBackend, _>(&module, grads, 1.0);

        assert!((measured - before).abs() < 1e-6 * before.max(1.0));
        let after = grad_norm::<TestBackend, _>(&module, &clipped);
        assert!((after - 1.0).abs() < 1e-3, "clipped norm was {after}");
    }

    #[test]
    fn small_gradients_are_untouched() {
        let module = pair();
        let grads = grads_for(&module, 1000.0);
        let norm = grad_norm::<TestBackend, _>(&module, &grads);

        let (clipped, _) = clip_grad_norm::<TestBackend, _>(&module, grads, norm * 2.0);

        assert!((grad_norm::<TestBackend, _>(&module, &clipped) - norm).abs() < 1e-6 * norm);
    }
}
