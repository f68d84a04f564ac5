pub(crate) mod merge_vectors;
