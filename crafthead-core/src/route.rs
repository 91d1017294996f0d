// File: crafthead-core/src/route.rs

use crafthead_common::models::{Game, RequestDescriptor, SkinModel, View, MAX_SIZE};
use crate::identity::classify;
use crate::Error;

/// Parse `/{game?}/{armor/}?{view}/{identity}[/{size}][.png]` plus the
/// optional `model` query value into a request descriptor.
pub fn parse_request_path(path: &str, model: Option<&str>) -> Result<RequestDescriptor, Error> {
    let trimmed = path.trim().trim_matches('/');
    let trimmed = trimmed.strip_suffix(".png").unwrap_or(trimmed);
    let mut segments = trimmed.split('/').filter(|s| !s.is_empty()).peekable();

    let game = match segments.peek().and_then(|s| s.parse::<Game>().ok()) {
        Some(game) => {
            segments.next();
            game
        }
        None => Game::default(),
    };

    let armored = segments.next_if(|s| s.eq_ignore_ascii_case("armor")).is_some();

    let view: View = segments
        .next()
        .ok_or_else(|| Error::InvalidRequest(format!("no view in '{path}'")))?
        .parse()?;

    let identity = segments
        .next()
        .ok_or_else(|| Error::InvalidRequest(format!("no identity in '{path}'")))?;

    let size = segments.next().map(parse_size).transpose()?;

    if let Some(extra) = segments.next() {
        return Err(Error::InvalidRequest(format!("unexpected path segment '{extra}'")));
    }

    let model_override = model.map(str::parse::<SkinModel>).transpose()?;
    let kind = classify(identity, game)?.kind();

    let mut descriptor = RequestDescriptor::new(game, view, identity, kind)
        .with_armored(armored)
        .with_model(model_override);
    if let Some(size) = size {
        descriptor = descriptor.with_size(size);
    }
    Ok(descriptor)
}

fn parse_size(raw: &str) -> Result<u32, Error> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidRequest(format!("size '{raw}' is not a number")));
    }
    // Oversized values clamp like any other large size.
    Ok(raw.parse::<u32>().unwrap_or(MAX_SIZE))
}
