// src/services/response_parser.rs

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_TITLE_CHARS: usize = 100;
pub const FALLBACK_TITLE: &str = "AI Generated Review";
const POSITIVE_TITLE: &str = "Great experience";
const NEUTRAL_TITLE: &str = "Service review";

// Compilados uma vez. `None` só se o padrão for inválido, e aí o parser cai no fallback.
static TITLE_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)Title:\s*(.+?)(?:\n|$)").ok());
static REVIEW_BODY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)Review:\s*(.+)").ok());
static TITLE_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Title|Review):\s*").ok());
static REVIEW_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^Review:\s*").ok());

/// Resultado do parse: título e corpo da avaliação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReview {
    pub title: String,
    pub content: String,
}

#[derive(Debug)]
struct ParseFailure;

type Strategy = fn(&str) -> Result<Option<(String, String)>, ParseFailure>;

// Em ordem: a primeira que reconhecer o texto vence.
const STRATEGIES: &[Strategy] = &[labeled_sections, first_line_as_title];

/// Transforma o texto bruto do provedor em (título, conteúdo). Nunca falha.
pub fn parse_review(raw: &str) -> ParsedReview {
    match try_parse(raw) {
        Ok(parsed) => parsed,
        Err(ParseFailure) => {
            tracing::warn!("Não foi possível interpretar a resposta da IA; usando o texto inteiro");
            ParsedReview {
                title: FALLBACK_TITLE.to_string(),
                content: raw.trim().to_string(),
            }
        }
    }
}

fn try_parse(raw: &str) -> Result<ParsedReview, ParseFailure> {
    let mut extracted = None;
    for strategy in STRATEGIES {
        if let Some(found) = strategy(raw)? {
            extracted = Some(found);
            break;
        }
    }
    let (title, content) = extracted.ok_or(ParseFailure)?;

    // Limpa rótulos que sobraram
    let title = strip(&TITLE_PREFIX, title.trim())?;
    let title = strip(&TITLE_PREFIX, &title)?;
    let content = strip(&REVIEW_PREFIX, content.trim())?;

    let content = if content.is_empty() {
        raw.trim().to_string()
    } else {
        content
    };

    let title = if title.is_empty() {
        synthesize_title(&content).to_string()
    } else {
        title
    };

    Ok(ParsedReview {
        title: truncate_chars(&title, MAX_TITLE_CHARS),
        content,
    })
}

// `Title: ...` numa linha e `Review: ...` (várias linhas) no resto
fn labeled_sections(raw: &str) -> Result<Option<(String, String)>, ParseFailure> {
    let title_re = compiled(&TITLE_LINE)?;
    let review_re = compiled(&REVIEW_BODY)?;

    let title = title_re.captures(raw).and_then(|c| c.get(1));
    let body = review_re.captures(raw).and_then(|c| c.get(1));

    Ok(match (title, body) {
        (Some(title), Some(body)) => Some((
            title.as_str().trim().to_string(),
            body.as_str().trim().to_string(),
        )),
        _ => None,
    })
}

// Primeira linha vira título; com uma linha só, o texto inteiro vira conteúdo
fn first_line_as_title(raw: &str) -> Result<Option<(String, String)>, ParseFailure> {
    let trimmed = raw.trim();
    let mut lines = trimmed.split('\n');
    let title = lines.next().unwrap_or_default().trim().to_string();
    let rest = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    let content = if trimmed.contains('\n') {
        rest
    } else {
        trimmed.to_string()
    };

    Ok(Some((title, content)))
}

fn compiled(re: &'static LazyLock<Option<Regex>>) -> Result<&'static Regex, ParseFailure> {
    LazyLock::force(re).as_ref().ok_or(ParseFailure)
}

fn strip(re: &'static LazyLock<Option<Regex>>, text: &str) -> Result<String, ParseFailure> {
    Ok(compiled(re)?.replace(text, "").trim().to_string())
}

fn synthesize_title(content: &str) -> &'static str {
    let lower = content.to_lowercase();
    if lower.contains("good") || lower.contains("great") {
        POSITIVE_TITLE
    } else {
        NEUTRAL_TITLE
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
