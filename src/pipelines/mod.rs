/// Multi-Label Classification
pub mod multi_label_classification;
