use std::path::Path;

use clap::Parser;

use folio::cli::{dispatch, Cli};
use folio::error::ExitCode;

fn write_config(dir: &Path, store: &str) -> String {
    let config = dir.join("folio.yaml");
    std::fs::write(
        &config,
        format!(
            "site:\n  title: Lab Notes\nstore:\n  source: {store}\ntheme:\n  prefs_file: {}\n",
            dir.join("prefs.json").display()
        ),
    )
    .unwrap();
    config.to_string_lossy().into_owned()
}

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("folio").chain(args.iter().copied()))
}

#[tokio::test]
async fn build_writes_site_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("articles.json");
    std::fs::write(
        &store,
        r#"[{"id": 7, "title": "Numbered", "content": "- one\n- two", "tags": ["Linux"]}]"#,
    )
    .unwrap();
    let config = write_config(dir.path(), &store.to_string_lossy());
    let dest = dir.path().join("out");

    dispatch(cli(&["--config", &config, "build", "--dest", &dest.to_string_lossy()]))
        .await
        .unwrap();

    let article = std::fs::read_to_string(dest.join("article/7.html")).unwrap();
    assert!(article.contains("<ul><li>one</li><li>two</li></ul>"));
    assert!(article.contains("Numbered | Lab Notes"));
    assert!(dest.join("tags/linux.html").is_file());
    assert!(dest.join("home.html").is_file());
    assert!(dest.join("default.svg").is_file());
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dest.join("site.json")).unwrap()).unwrap();
    assert_eq!(manifest[0]["kind"], "article");
    assert_eq!(manifest[0]["id"], "7");
}

#[tokio::test]
async fn unreadable_store_exits_with_store_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("nope.json").to_string_lossy());
    let dest = dir.path().join("out");

    let err = dispatch(cli(&["--config", &config, "build", "--dest", &dest.to_string_lossy()]))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::STORE_ERROR);
    assert!(dest.join("index.html").is_file());
}

#[tokio::test]
async fn invalid_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("folio.yaml");
    std::fs::write(&config, "site:\n  title: \"\"\n").unwrap();

    let err = dispatch(cli(&["--config", &config.to_string_lossy(), "newsletter", "a@b.io"]))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
}

#[tokio::test]
async fn contact_without_relay_succeeds_and_missing_fields_fail() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "articles.json");

    dispatch(cli(&[
        "--config", &config, "contact", "--name", "Ada", "--email", "ada@example.com",
        "--subject", "Hi", "--message", "Hello",
    ]))
    .await
    .unwrap();

    let err = dispatch(cli(&["--config", &config, "contact", "--name", "Ada"]))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::ERROR);
    assert!(err.to_string().contains("email, subject, message"));
}

#[tokio::test]
async fn demo_config_and_store_load() {
    use folio::config::SiteConfig;
    use folio::store::{StoreLoader, StoreSource};

    let config = SiteConfig::load(Some(Path::new("demos/folio.yaml"))).unwrap();
    assert_eq!(config.site.title, "Lab Notes");
    assert_eq!(config.display.ribbons[1].class.as_deref(), Some("ccnp"));

    let store = StoreLoader::new(StoreSource::parse(&config.store.source))
        .load()
        .await
        .unwrap();
    assert_eq!(store.len(), 4);
    assert!(store.find("42").is_some());

    assert_eq!(config.portfolio.documents.len(), 3);
    assert_eq!(config.portfolio.projects.len(), 3);
    assert!(config.assets_dir.unwrap().join("covers/ospf.svg").is_file());
}
