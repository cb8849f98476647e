use aurora_browser::services::navigation_resolver::NavigationResolver;
use aurora_browser::services::website_registry::WebsiteRegistry;
use aurora_browser::types::errors::NavigationError;
use aurora_browser::types::settings::HOME_URL;
use aurora_browser::types::website::{BadgeIcon, BadgeTone, SecurityBadge, SecurityLevel};
use rstest::rstest;

fn resolver() -> NavigationResolver {
    NavigationResolver::new(WebsiteRegistry::builtin())
}

#[rstest]
#[case("trustmail.com", "trustmail.com")]
#[case("  trustmail.com  ", "trustmail.com")]
#[case("trustmail.com?x=1", "trustmail.com")]
#[case("promail.pro?ref=ad&utm=2", "promail.pro")]
#[case("trustmai1.com", "trustmai1.com")]
#[case("browser://welcome", "browser://welcome")]
fn test_known_sites_resolve_to_canonical_domain(#[case] input: &str, #[case] expected: &str) {
    let resolution = resolver().resolve(input);
    assert_eq!(resolution.final_url, expected);
    assert!(resolution.descriptor.is_some());
}

#[rstest]
#[case("nowhere.example", "nowhere.example")]
#[case("  https://trustmail.com ", "https://trustmail.com")]
#[case("TRUSTMAIL.COM", "TRUSTMAIL.COM")]
#[case("unknown.site?q=1", "unknown.site?q=1")]
fn test_unknown_input_passes_through_trimmed(#[case] input: &str, #[case] expected: &str) {
    let resolution = resolver().resolve(input);
    assert_eq!(resolution.final_url, expected);
    assert!(resolution.descriptor.is_none());
    assert_eq!(resolution.title(), expected);
    assert_eq!(resolution.favicon(), None);
}

#[test]
fn test_resolution_title_and_favicon_come_from_site() {
    let resolution = resolver().resolve("promail.pro");
    assert_eq!(resolution.title(), "ProMail");
    assert_eq!(resolution.favicon(), Some("#7c3aed"));
}

#[test]
fn test_require_reports_unresolved_url() {
    let resolver = resolver();
    assert_eq!(resolver.require(HOME_URL).unwrap().name, "Welcome");
    assert_eq!(
        resolver.require("nowhere.example").unwrap_err(),
        NavigationError::UnresolvedUrl("nowhere.example".to_string())
    );
}

#[test]
fn test_lookalike_is_flagged_as_phishing() {
    let resolver = resolver();
    let fake = resolver.require("trustmai1.com").unwrap();
    let real = resolver.require("trustmail.com").unwrap();
    assert_eq!(fake.name, real.name);
    assert_eq!(fake.security, SecurityLevel::Phishing);
    assert_eq!(real.security, SecurityLevel::Secure);
}

#[rstest]
#[case("trustmail.com", BadgeIcon::Lock, BadgeTone::Green)]
#[case("trustmai1.com", BadgeIcon::Alert, BadgeTone::Red)]
#[case("free-prizes.win", BadgeIcon::Alert, BadgeTone::Red)]
#[case("nowhere.example", BadgeIcon::Lock, BadgeTone::Neutral)]
fn test_security_badge(#[case] url: &str, #[case] icon: BadgeIcon, #[case] tone: BadgeTone) {
    let resolver = resolver();
    let badge = SecurityBadge::for_site(resolver.registry().lookup(url));
    assert_eq!(badge, SecurityBadge { icon, tone });
}
