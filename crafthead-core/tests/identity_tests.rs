// tests/identity_tests.rs

mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use crafthead_common::models::{Game, IdentityKind, RequestDescriptor, View};
use crafthead_core::identity::{
    classify, is_offline_uuid, offline_uuid, ClassifiedIdentity, DefaultSkin, IdentityNormalizer,
};
use crafthead_core::profile::ProfileResolver;
use crafthead_core::Error;
use test_utils::*;

fn normalizer(provider: FakeProfileProvider) -> (IdentityNormalizer, Arc<FakeProfileProvider>) {
    let provider = Arc::new(provider);
    let resolver = Arc::new(ProfileResolver::new(
        provider.clone(),
        Duration::from_secs(3600),
        Duration::from_secs(5),
    ));
    (IdentityNormalizer::new(resolver), provider)
}

#[test]
fn test_hyphenated_uuid_matches_plain_form() {
    let samples = [
        "ef613480-5b62-44e4-a446-7fbe85d65513",
        "069A79F4-44E9-4726-A5BE-FCA90E38AAF5",
        "00000000-0000-0000-0000-000000000000",
    ];
    for hyphenated in samples {
        let plain = hyphenated.replace('-', "");
        let a = classify(hyphenated, Game::Minecraft).unwrap();
        let b = classify(&plain, Game::Minecraft).unwrap();
        assert_eq!(a, b, "{hyphenated}");
        assert_eq!(a, ClassifiedIdentity::Uuid(plain.to_lowercase()));
    }
}

#[test]
fn test_short_tokens_are_usernames() {
    assert_eq!(
        classify("CherryJimbo", Game::Minecraft).unwrap(),
        ClassifiedIdentity::Username("CherryJimbo".into())
    );
    assert_eq!(classify("a", Game::Hytale).unwrap().kind(), IdentityKind::Username);
    assert_eq!(classify("sixteen_chars_xx", Game::Minecraft).unwrap().kind(), IdentityKind::Username);
}

#[test]
fn test_texture_ids_with_leading_zeros_normalize_identically() {
    let digest = JIMBO_TEXTURE;
    let expected = classify(digest, Game::Minecraft).unwrap();
    assert_eq!(expected, ClassifiedIdentity::TextureId(digest.to_string()));

    let full = format!("{}{}", "f", &digest[1..]);
    for zeros in 0..=26 {
        let padded = format!("{}{}", "0".repeat(zeros), full);
        if padded.len() <= 16 || padded.len() == 32 || padded.len() == 36 {
            continue;
        }
        assert_eq!(
            classify(&padded, Game::Minecraft).unwrap(),
            ClassifiedIdentity::TextureId(full.clone()),
            "{zeros} leading zeros"
        );
    }
}

#[test]
fn test_sixty_four_and_sixty_three_char_forms_agree() {
    let with_zero = format!("0{JIMBO_TEXTURE}");
    assert_eq!(with_zero.len(), 64);
    assert_eq!(
        classify(&with_zero, Game::Minecraft).unwrap(),
        classify(JIMBO_TEXTURE, Game::Minecraft).unwrap()
    );
}

#[test]
fn test_too_long_texture_id_rejected() {
    let token = "a".repeat(65);
    assert!(matches!(classify(&token, Game::Minecraft), Err(Error::InvalidIdentity(_))));
    let over = "a".repeat(91);
    assert!(matches!(classify(&over, Game::Minecraft), Err(Error::InvalidIdentity(_))));
}

#[test]
fn test_texture_ids_need_lowercase_hex_and_a_texture_game() {
    let upper = "A".repeat(40);
    assert!(matches!(classify(&upper, Game::Minecraft), Err(Error::InvalidIdentity(_))));
    let hex = "b".repeat(40);
    assert!(matches!(classify(&hex, Game::Hytale), Err(Error::InvalidIdentity(_))));
    assert!(classify("", Game::Minecraft).is_err());
    assert!(classify("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", Game::Minecraft).is_err());
}

#[test]
fn test_all_zero_texture_id_collapses() {
    let zeros = "0".repeat(40);
    assert_eq!(
        classify(&zeros, Game::Minecraft).unwrap(),
        ClassifiedIdentity::TextureId("0".into())
    );
}

#[test]
fn test_offline_identity_is_stable() {
    let a = offline_uuid("NobodyHere");
    let b = offline_uuid("NobodyHere");
    assert_eq!(a, b);
    assert_ne!(a, offline_uuid("nobodyhere"));
    assert_eq!(a.get_version_num(), 3);
    assert_eq!(DefaultSkin::for_uuid(&a), DefaultSkin::for_uuid(&b));
}

#[test]
fn test_default_skin_parity() {
    // msb ^ lsb == 1 -> odd -> Alex
    let alex = uuid::Uuid::from_u64_pair(0, 1);
    assert_eq!(DefaultSkin::for_uuid(&alex), DefaultSkin::Alex);
    // the two halves cancel -> even -> Steve
    let steve = uuid::Uuid::from_u64_pair(0x0000_0001_0000_0001, 0);
    assert_eq!(DefaultSkin::for_uuid(&steve), DefaultSkin::Steve);
}

#[tokio::test]
async fn test_unknown_username_gets_offline_identity() {
    let (normalizer, provider) = normalizer(FakeProfileProvider::new());
    let request = RequestDescriptor::new(Game::Minecraft, View::Avatar, "NobodyHere", IdentityKind::Username);

    let first = normalizer.normalize(&request).await.unwrap();
    let second = normalizer.normalize(&request).await.unwrap();

    assert!(first.offline);
    assert_eq!(first.descriptor.identity_kind, IdentityKind::Uuid);
    assert_eq!(first.descriptor.raw_identity, offline_uuid("NobodyHere").simple().to_string());
    assert_eq!(first.descriptor.raw_identity, second.descriptor.raw_identity);
    assert!(is_offline_uuid(&first.descriptor.raw_identity));
    assert_eq!(first.requested_as, "NobodyHere");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_known_username_resolves_to_canonical_id() {
    let (normalizer, provider) = normalizer(FakeProfileProvider::new().with_profile(jimbo()));
    let request = RequestDescriptor::new(Game::Minecraft, View::Helm, "CherryJimbo", IdentityKind::Username)
        .with_size(64);

    let normalized = normalizer.normalize(&request).await.unwrap();
    assert!(!normalized.offline);
    assert_eq!(normalized.descriptor.raw_identity, JIMBO_ID);
    assert_eq!(normalized.descriptor.size, 64);
    assert_eq!(normalized.descriptor.view, View::Helm);
    assert!(normalized.prefetched.is_some());
    // The input descriptor is untouched.
    assert_eq!(request.raw_identity, "CherryJimbo");

    // Second lookup is answered from the name index.
    let again = normalizer.normalize(&request).await.unwrap();
    assert_eq!(again.descriptor.raw_identity, JIMBO_ID);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_invalid_identity_fails_normalization() {
    let (normalizer, _) = normalizer(FakeProfileProvider::new());
    let request = RequestDescriptor::new(Game::Hytale, View::Avatar, "x".repeat(40), IdentityKind::Username);
    let err = normalizer.normalize(&request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidIdentity(_)));
}
