//! Statement text recognition: line grammars and field normalizers.

pub mod rules;
