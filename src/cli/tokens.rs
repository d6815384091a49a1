//! `chatreveal tokens`: dumps the tokenizer output for a text.

use std::error::Error;

use serde::Serialize;

use crate::text::{plain_length, tokenize, word_boundaries, Span};

#[derive(Debug, Serialize)]
struct TokenView<'a> {
    kind: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TokenReport<'a> {
    tokens: Vec<TokenView<'a>>,
    plain_length: usize,
    word_boundaries: Vec<usize>,
}

fn report(spans: &[Span]) -> TokenReport<'_> {
    TokenReport {
        tokens: spans
            .iter()
            .map(|span| TokenView {
                kind: span.kind.as_str(),
                text: &span.text,
                href: span.kind.link_meta().map(|meta| meta.href()),
            })
            .collect(),
        plain_length: plain_length(spans),
        word_boundaries: word_boundaries(spans),
    }
}

pub fn render_tokens(text: &str, pretty: bool) -> Result<String, serde_json::Error> {
    let spans = tokenize(text);
    let report = report(&spans);
    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
}

pub fn print_tokens(text: &str, pretty: bool) -> Result<(), Box<dyn Error>> {
    println!("{}", render_tokens(text, pretty)?);
    Ok(())
}
