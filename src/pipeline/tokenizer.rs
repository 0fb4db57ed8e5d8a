//! Word and punctuation splitting
//!
//! Splits come from the BERT pre-tokenizer: whitespace separates words and
//! every punctuation character is a token of its own. The gaps between split
//! offsets are the whitespace runs. A single space after a token is recorded
//! on that token; any other run becomes a space token.

use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::config::OOV_RANK;
use crate::core::{Token, Vocab};
use crate::error::{Result, ShimError};

pub fn tokenize(text: &str, vocab: &Vocab) -> Result<Vec<Token>> {
	let mut pretokenized = PreTokenizedString::from(text);
	BertPreTokenizer
		.pre_tokenize(&mut pretokenized)
		.map_err(|e| ShimError::Tokenize(e.to_string()))?;

	let mut tokens: Vec<Token> = Vec::new();
	let mut cursor = 0;

	for (piece, (start, end), _) in pretokenized.get_splits(OffsetReferential::Original, OffsetType::Byte) {
		if start > cursor {
			push_whitespace(&mut tokens, &text[cursor..start]);
		}
		tokens.push(lookup(piece, vocab, is_punct(piece)));
		cursor = end;
	}

	if cursor < text.len() {
		push_whitespace(&mut tokens, &text[cursor..]);
	}

	Ok(tokens)
}

fn is_punct(piece: &str) -> bool {
	!piece.chars().any(char::is_alphanumeric)
}

fn push_whitespace(tokens: &mut Vec<Token>, run: &str) {
	let rest = match tokens.last_mut() {
		Some(prev) if run.starts_with(' ') => {
			prev.whitespace = true;
			&run[1..]
		}
		_ => run,
	};

	if !rest.is_empty() {
		tokens.push(Token::space(rest));
	}
}

fn lookup(text: &str, vocab: &Vocab, is_punct: bool) -> Token {
	let (rank, has_vector) = vocab
		.get(text)
		.map_or((OOV_RANK, false), |lex| (lex.rank, lex.has_vector()));

	if is_punct {
		Token::punct(text, rank, has_vector)
	} else {
		Token::word(text, rank, has_vector)
	}
}
