mod hershey_simplex;
pub mod hershey_text_annotator;
