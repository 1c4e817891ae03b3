// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Root-relative paths resolve against `origin`; anything else is returned as is.
pub fn resolve_asset_url(origin: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{path}", origin.trim_end_matches('/'))
    } else {
        path.to_owned()
    }
}

/// Rewrites every root-relative image target in `markdown`: inline
/// `![alt](/x.png)` and `![alt](</x.png>)`, plus reference definitions
/// (`[r]: /x.png`) that an image uses. All other bytes, including links that
/// are not images, pass through.
pub fn rewrite_markdown_images(origin: &str, markdown: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let labels = image_reference_labels(markdown);
    let mut out = String::with_capacity(markdown.len());

    for line in markdown.split_inclusive('\n') {
        match definition_target_start(line, &labels) {
            Some(at) => {
                let (head, target) = line.split_at(at);
                out.push_str(head);
                let rest = push_origin(&mut out, origin, target);
                out.push_str(rest);
            }
            None => rewrite_inline_images(&mut out, origin, line),
        }
    }
    out
}

fn rewrite_inline_images(out: &mut String, origin: &str, line: &str) {
    let mut rest = line;
    while let Some(start) = rest.find("![") {
        let (before, candidate) = rest.split_at(start);
        out.push_str(before);

        let Some(target_start) = image_target_start(candidate) else {
            out.push_str("![");
            rest = &candidate[2..];
            continue;
        };

        let (head, target) = candidate.split_at(target_start);
        out.push_str(head);
        rest = push_origin(out, origin, target);
    }
    out.push_str(rest);
}

/// Pushes the origin, after the opening `<` of a wrapped target, when the
/// target is root-relative. Returns what is left to copy.
fn push_origin<'a>(out: &mut String, origin: &str, target: &'a str) -> &'a str {
    if target.starts_with('/') {
        out.push_str(origin);
        target
    } else if let Some(inner) = target.strip_prefix('<')
        && inner.starts_with('/')
    {
        out.push('<');
        out.push_str(origin);
        inner
    } else {
        target
    }
}

/// Alt text and the byte offset just past its `]` for an image that starts
/// at offset 0.
fn image_alt(candidate: &str) -> Option<(&str, usize)> {
    let close = candidate[2..].find(']')? + 2;
    let alt = &candidate[2..close];
    (!alt.contains('\n')).then_some((alt, close + 1))
}

/// Byte offset just past `](` for an inline image that starts at offset 0.
fn image_target_start(candidate: &str) -> Option<usize> {
    let (_, end) = image_alt(candidate)?;
    candidate[end..].starts_with('(').then_some(end + 1)
}

/// Labels used by full (`![a][r]`), collapsed (`![r][]`) and shortcut
/// (`![r]`) reference images, normalized.
fn image_reference_labels(markdown: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut rest = markdown;
    while let Some(start) = rest.find("![") {
        let candidate = &rest[start..];
        let Some((alt, end)) = image_alt(candidate) else {
            rest = &candidate[2..];
            continue;
        };
        let after = &candidate[end..];
        if let Some(reference) = after.strip_prefix('[') {
            if let Some(close) = reference.find(']') {
                let label = &reference[..close];
                labels.push(normalize_label(if label.is_empty() { alt } else { label }));
            }
        } else if !after.starts_with('(') && !after.starts_with(':') {
            labels.push(normalize_label(alt));
        }
        rest = after;
    }
    labels
}

/// Byte offset of the target in a reference definition line whose label an
/// image uses.
fn definition_target_start(line: &str, labels: &[String]) -> Option<usize> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let body = line[indent..].strip_prefix('[')?;
    let close = body.find("]:")?;
    if !labels.contains(&normalize_label(&body[..close])) {
        return None;
    }
    let after = &body[close + 2..];
    let spaces = after.len() - after.trim_start_matches([' ', '\t']).len();
    Some(indent + 1 + close + 2 + spaces)
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
