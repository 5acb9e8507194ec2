/// BERT for Multi-Label Classification (such as toxic comment detection)
pub mod multi_label;
