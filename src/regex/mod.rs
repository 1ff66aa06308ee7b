// Cached compilation of the regular expressions used by the parser and the
// document model.

mod cache;
