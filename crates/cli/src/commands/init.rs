//! `hashnav init`: Write a default config and a skeleton site.

use std::path::Path;

use hashnav_config::{CONFIG_FILE, RouterConfig};

use super::CommandResult;

const SHELL: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Loading…</title>
</head>
<body>
  <header id="site-header"></header>
  <div class="layout">
    <aside id="site-sidebar" hidden></aside>
    <main id="page-content"><p>Loading…</p></main>
  </div>
  <footer id="site-footer"></footer>
  <div id="modal" data-modal-backdrop aria-hidden="true">
    <div class="dialog">
      <button data-close-modal>Close</button>
      <p>Thanks for getting in touch.</p>
    </div>
  </div>
</body>
</html>
"##;

const HEADER: &str = r##"<nav>
  <a href="#/home">Home</a>
  <a href="#/about">About</a>
  <a href="#/contact">Contact</a>
</nav>
"##;

const FOOTER: &str = "<small>Built with hashnav.</small>\n";

const HOME: &str = r#"<section class="reveal">
  <h1>Home</h1>
  <p>Fragments load on demand as the hash changes.</p>
</section>
"#;

const ABOUT: &str = r#"<section class="reveal">
  <h1>About</h1>
  <p>This page has a sidebar.</p>
</section>
"#;

const CONTACT: &str = r#"<section>
  <h1>Contact</h1>
  <button data-open-modal>Say hello</button>
</section>
"#;

const NOT_FOUND: &str = r##"<section class="page-404">
  <h1>Not Found</h1>
  <p>Nothing lives here. <a href="#/home">Go home</a>.</p>
</section>
"##;

const SIDEBAR_ABOUT: &str = "<h2>About</h2>\n<p>Who we are.</p>\n";

const SIDEBAR_CONTACT: &str = "<h2>Contact</h2>\n<p>hello@example.com</p>\n";

pub async fn run(dir: &Path, force: bool) -> CommandResult {
    println!("🧭 hashnav — New Site");
    println!("=====================\n");

    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        println!("✅ Created directory: {}", dir.display());
    }

    let files: [(String, String); 10] = [
        (CONFIG_FILE.to_string(), RouterConfig::default_toml()),
        ("index.html".into(), SHELL.into()),
        ("components/header.html".into(), HEADER.into()),
        ("components/footer.html".into(), FOOTER.into()),
        ("components/sidebar-about.html".into(), SIDEBAR_ABOUT.into()),
        ("components/sidebar-contact.html".into(), SIDEBAR_CONTACT.into()),
        ("pages/home.html".into(), HOME.into()),
        ("pages/about.html".into(), ABOUT.into()),
        ("pages/contact.html".into(), CONTACT.into()),
        ("pages/404.html".into(), NOT_FOUND.into()),
    ];

    let mut written = 0;
    for (relative, content) in &files {
        let path = dir.join(relative);
        if path.exists() && !force {
            println!("  Exists, skipped: {relative}");
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        println!("✅ Wrote {relative}");
        written += 1;
    }

    println!();
    println!("{written} file(s) written.");
    println!("Next: cd {} && hashnav navigate '#/about'", dir.display());
    Ok(())
}
