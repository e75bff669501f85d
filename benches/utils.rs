use pugparse::{
    ast::BlockMode,
    token::{Token, TokenKind},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generate n random, well-formed token documents to use in the benchmark
pub fn generate_random_documents(n: usize) -> Vec<Vec<Token>> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility
    (0..n).map(|_| random_document(&mut rng)).collect()
}

fn random_document(rng: &mut StdRng) -> Vec<Token> {
    let mut kinds = vec![
        TokenKind::Doctype {
            val: "html".to_owned(),
        },
        TokenKind::Newline,
        tag("html"),
        TokenKind::Indent,
        tag("body"),
        TokenKind::Indent,
    ];
    let sections = rng.random_range(5..20);
    for i in 0..sections {
        if i > 0 {
            kinds.push(TokenKind::Newline);
        }
        random_section(rng, &mut kinds, 0);
    }
    kinds.extend([TokenKind::Outdent, TokenKind::Outdent, TokenKind::Eos]);
    position(kinds)
}

/// Appends one top-level construct, recursing into nested blocks.
fn random_section(rng: &mut StdRng, kinds: &mut Vec<TokenKind>, depth: usize) {
    let nested = depth < 3 && rng.random_bool(0.4);
    match rng.random_range(0..6) {
        0 => {
            kinds.extend([
                tag("p"),
                TokenKind::Class {
                    val: random_string(rng, 3, 8),
                },
                TokenKind::Text {
                    val: random_string(rng, 5, 40),
                },
                TokenKind::InterpolatedCode {
                    val: random_string(rng, 3, 8),
                    buffer: true,
                    must_escape: true,
                },
            ]);
        }
        1 => {
            kinds.extend([
                tag("a"),
                TokenKind::StartAttributes,
                TokenKind::Attribute {
                    name: "href".to_owned(),
                    val: format!("'/{}'", random_string(rng, 3, 8)),
                    must_escape: true,
                },
                TokenKind::Attribute {
                    name: "title".to_owned(),
                    val: format!("'{}'", random_string(rng, 3, 12)),
                    must_escape: true,
                },
                TokenKind::EndAttributes,
                TokenKind::Text {
                    val: random_string(rng, 3, 12),
                },
            ]);
        }
        2 => {
            kinds.push(TokenKind::If {
                val: random_string(rng, 3, 8),
            });
            block(rng, kinds, depth);
            kinds.push(TokenKind::Else);
            block(rng, kinds, depth);
            return;
        }
        3 => {
            kinds.push(TokenKind::Each {
                val: "item".to_owned(),
                key: None,
                obj: random_string(rng, 3, 8),
            });
            block(rng, kinds, depth);
            return;
        }
        4 => {
            kinds.push(TokenKind::Call {
                val: random_string(rng, 3, 8),
                args: Some("1, 2".to_owned()),
            });
        }
        _ => {
            kinds.push(TokenKind::Block {
                val: random_string(rng, 3, 8),
                mode: BlockMode::Append,
            });
        }
    }
    if nested {
        block(rng, kinds, depth);
    }
}

fn block(rng: &mut StdRng, kinds: &mut Vec<TokenKind>, depth: usize) {
    kinds.push(TokenKind::Indent);
    let children = rng.random_range(1..4);
    for i in 0..children {
        if i > 0 {
            kinds.push(TokenKind::Newline);
        }
        random_section(rng, kinds, depth + 1);
    }
    kinds.push(TokenKind::Outdent);
}

fn tag(name: &str) -> TokenKind {
    TokenKind::Tag {
        val: name.to_owned(),
    }
}

/// Assigns line and column numbers the way a lexer would.
fn position(kinds: Vec<TokenKind>) -> Vec<Token> {
    let mut line = 1;
    let mut column = 0;
    kinds
        .into_iter()
        .map(|kind| {
            if matches!(
                kind,
                TokenKind::Newline | TokenKind::Indent | TokenKind::Outdent
            ) {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            Token::new(kind, line, column)
        })
        .collect()
}

/// Generate a random string with length between min and max
fn random_string(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let charset = "abcdefghijklmnopqrstuvwxyz";
    let len = rng.random_range(min_len..=max_len);

    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..charset.len());
            charset.chars().nth(idx).unwrap()
        })
        .collect()
}

// Print binary size information - can be used from individual benchmarks
pub fn print_binary_size() {
    let binary_path = std::env::current_exe().unwrap();
    let metadata = std::fs::metadata(binary_path.clone()).unwrap();
    let size_bytes = metadata.len();
    let size_kb = size_bytes as f64 / 1024.0;
    let size_mb = size_kb / 1024.0;

    println!(
        "Binary size: {:.2} MB ({:.2} KB, {} bytes)",
        size_mb, size_kb, size_bytes
    );
    println!("Binary path: {}", binary_path.display());
}
