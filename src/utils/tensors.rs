use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Stack equal-length rows of token-level values into a `[rows, seq_length]` Int tensor
pub fn stack_ints<B: Backend>(
    rows: &[&[u32]],
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();

    let values: Vec<B::IntElem> = rows
        .iter()
        .flat_map(|row| row.iter().map(|value| (*value as i64).elem()))
        .collect();

    Tensor::from_data(Data::new(values, Shape::new([batch_size, seq_length])), device)
}

/// Stack fixed-width float rows into a `[rows, N]` Float tensor
pub fn stack_floats<B: Backend, const N: usize>(
    rows: &[[f32; N]],
    device: &B::Device,
) -> Tensor<B, 2> {
    let batch_size = rows.len();

    let values: Vec<B::FloatElem> = rows
        .iter()
        .flat_map(|row| row.iter().map(|&value| value.elem()))
        .collect();

    Tensor::from_data(Data::new(values, Shape::new([batch_size, N])), device)
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn stacks_int_rows() {
        let device = Default::default();
        let rows: Vec<&[u32]> = vec![&[1, 2, 3], &[4, 5, 6]];

        let tensor = stack_ints::<TestBackend>(&rows, 3, &device);

        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(
            tensor.into_data().convert::<i64>().value,
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn stacks_float_rows() {
        let device = Default::default();

        let tensor = stack_floats::<TestBackend, 2>(&[[0.0, 1.0], [1.0, 0.0]], &device);

        assert_eq!(tensor.dims(), [2, 2]);
        assert_eq!(
            tensor.into_data().convert::<f32>().value,
            vec![0.0, 1.0, 1.0, 0.0]
        );
    }
}
