use crate::symbols::ParamDoc;

use super::patterns::{
    DOC_CONTINUATION, DOC_DEPRECATED, DOC_FLUSH_TAG, DOC_OPENER, DOC_PARAM, DOC_SLASH_PREFIX, DOC_STAR_PREFIX,
};

/// Documentation extracted from the comment block preceding a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DocComment {
    pub(crate) description: String,
    pub(crate) params: Vec<ParamDoc>,
    pub(crate) deprecated: Option<String>,
}

pub(crate) fn parse_doc_comment(lines: &[String]) -> DocComment {
    if lines.is_empty() {
        return DocComment::default();
    }
    let lines: Vec<&str> = lines.iter().map(|line| strip_terminator(line)).collect();
    DocComment {
        description: description_of(&lines),
        params: params_of(&lines),
        deprecated: lines
            .iter()
            .find_map(|line| DOC_DEPRECATED.captures(line))
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim().to_string()),
    }
}

fn strip_terminator(line: &str) -> &str {
    let trimmed = line.trim_end();
    trimmed.strip_suffix("*/").unwrap_or(trimmed)
}

fn description_of(lines: &[&str]) -> String {
    let mut parts = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(opener) = DOC_OPENER.find(line) {
            let rest = line[opener.end()..].trim_start_matches('<').trim();
            if !rest.is_empty() {
                parts.push(rest.to_string());
            }
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "*" || trimmed == "//" {
            parts.push("\n".to_string());
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            let rest = rest.trim();
            if !rest.is_empty() {
                parts.push(rest.to_string());
            }
            continue;
        }
        let text = DOC_STAR_PREFIX.replace(line, "\n");
        let text = DOC_SLASH_PREFIX.replace(&text, "\n");
        parts.push(text.into_owned());
    }
    parts.join(" ").trim().to_string()
}

fn params_of(lines: &[&str]) -> Vec<ParamDoc> {
    let mut params = Vec::new();
    let mut pending: Option<(String, Vec<String>)> = None;

    let flush = |pending: &mut Option<(String, Vec<String>)>, params: &mut Vec<ParamDoc>| {
        if let Some((name, docs)) = pending.take() {
            params.push(ParamDoc::new(name, docs.join(" ").trim()));
        }
    };

    for line in lines {
        if let Some(caps) = DOC_PARAM.captures(line) {
            flush(&mut pending, &mut params);
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let first = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            pending = Some((name, vec![first]));
        } else if DOC_FLUSH_TAG.is_match(line) {
            flush(&mut pending, &mut params);
        } else if let Some((_, docs)) = pending.as_mut()
            && let Some(caps) = DOC_CONTINUATION.captures(line)
        {
            let text = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !text.is_empty() {
                docs.push(text.to_string());
            }
        }
    }
    flush(&mut pending, &mut params);
    params
}

#[cfg(test)]
#[path = "../../tests/src/parser/doc_comment_tests.rs"]
mod tests;
