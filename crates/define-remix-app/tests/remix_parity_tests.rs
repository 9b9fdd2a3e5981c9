/// Integration tests comparing define-remix-app with Remix flat routes
///
/// Each test documents the equivalent Remix convention for reference.

use define_remix_app::{
    build_manifest, readable_string_to_route_path, route_path_to_readable_string, AppConfig,
    RouteFile, RouteFiles, RoutePathSegment,
};
use pretty_assertions::assert_eq;

fn manifest_for(names: &[&str]) -> define_remix_app::AppManifest {
    let files: RouteFiles = names
        .iter()
        .map(|name| RouteFile::new(format!("/app/routes/{}", name), ["default"]))
        .collect();
    build_manifest(&files, &AppConfig::for_app_dir("/app"))
}

fn matched_route_id(names: &[&str], url: &str) -> Option<String> {
    manifest_for(names)
        .match_path(url)
        .map(|m| m.route.extra_data.route_id.clone())
}

// ============================================================================
// Flat Route Conventions (Remix Parity)
// ============================================================================

#[test]
fn test_remix_dot_delimiters() {
    // Remix: app/routes/concerts.trending.tsx → /concerts/trending
    let manifest = manifest_for(&["concerts.trending.tsx"]);
    assert_eq!(manifest.routes[0].path_string, "/concerts/trending");
}

#[test]
fn test_remix_dynamic_segments() {
    // Remix: app/routes/concerts.$city.tsx → /concerts/:city
    assert_eq!(
        matched_route_id(&["concerts.$city.tsx"], "/concerts/salt-lake-city"),
        Some("routes/concerts.$city".to_string())
    );
}

#[test]
fn test_remix_index_routes() {
    // Remix: app/routes/_index.tsx → /
    // Remix: app/routes/concerts._index.tsx → /concerts (inside concerts.tsx)
    let names = ["_index.tsx", "concerts.tsx", "concerts._index.tsx"];
    assert_eq!(matched_route_id(&names, "/"), Some("routes/_index".to_string()));
    assert_eq!(
        matched_route_id(&names, "/concerts"),
        Some("routes/concerts._index".to_string())
    );
}

#[test]
fn test_remix_nested_without_layout_nesting() {
    // Remix: app/routes/concerts_.mine.tsx → /concerts/mine, not inside concerts.tsx
    let manifest = manifest_for(&["concerts.tsx", "concerts_.mine.tsx"]);
    let mine = &manifest.routes[1];
    assert_eq!(mine.path_string, "/concerts/mine");
    assert!(mine.parent_layouts.is_empty());
}

#[test]
fn test_remix_pathless_layouts() {
    // Remix: app/routes/_auth.login.tsx → /login inside _auth.tsx
    let manifest = manifest_for(&["_auth.tsx", "_auth.login.tsx", "_auth.register.tsx"]);
    let paths: Vec<&str> = manifest.routes.iter().map(|r| r.path_string.as_str()).collect();
    assert_eq!(paths, vec!["/login", "/register"]);
    assert!(manifest.routes.iter().all(|r| r.parent_layouts.len() == 1));
}

#[test]
fn test_remix_optional_segments() {
    // Remix: app/routes/($lang).categories.tsx → /categories and /en/categories
    let names = ["($lang).categories.tsx"];
    assert!(matched_route_id(&names, "/categories").is_some());
    assert!(matched_route_id(&names, "/en/categories").is_some());
    assert!(matched_route_id(&names, "/en/fr/categories").is_none());
}

#[test]
fn test_remix_splat_routes() {
    // Remix: app/routes/files.$.tsx → /files/* with params["*"]
    let manifest = manifest_for(&["files.$.tsx"]);
    let m = manifest.match_path("/files/talks/remix-conf.pdf").unwrap();
    assert_eq!(m.params.get("*"), Some(&"talks/remix-conf.pdf".to_string()));
}

#[test]
fn test_remix_escaping_special_characters() {
    // Remix: app/routes/sitemap[.]xml.tsx → /sitemap.xml
    // Remix: app/routes/[sitemap.xml].tsx → /sitemap.xml
    for name in ["sitemap[.]xml.tsx", "[sitemap.xml].tsx"] {
        let manifest = manifest_for(&[name]);
        assert_eq!(
            manifest.routes[0].path,
            vec![RoutePathSegment::static_text("sitemap.xml")]
        );
    }
}

#[test]
fn test_remix_folder_organization() {
    // Remix: app/routes/concerts.$city/route.tsx → /concerts/:city
    let manifest = manifest_for(&["concerts.$city/route.tsx", "concerts.$city/card.tsx"]);
    assert_eq!(manifest.routes.len(), 1);
    assert_eq!(manifest.routes[0].extra_data.route_id, "routes/concerts.$city");
}

// ============================================================================
// Readable URIs
// ============================================================================

#[test]
fn test_readable_uri_forms() {
    let path = readable_string_to_route_path("concerts/($lang)/$city/$").unwrap();
    assert_eq!(
        path,
        vec![
            RoutePathSegment::static_text("concerts"),
            RoutePathSegment::optional("lang"),
            RoutePathSegment::dynamic("city"),
            RoutePathSegment::catch_all(),
        ]
    );
    assert_eq!(route_path_to_readable_string(&path), "concerts/($lang)/$city/$");
}
