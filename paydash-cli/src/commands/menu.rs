use std::fmt::Write as _;

use anyhow::Result;
use paydash_client::{MenuItem, Permissions, default_menu, filter_menu};

use super::App;

/// Prints the navigation the cached profile is allowed to see. Works offline.
pub fn show(app: &App) -> Result<()> {
    let profile = app.cached_user()?;
    let visible = filter_menu(&default_menu(), &Permissions::from_profile(&profile));
    let mut out = String::new();
    render(&visible, 0, &mut out);
    print!("{out}");
    Ok(())
}

fn render(items: &[MenuItem], depth: usize, out: &mut String) {
    for item in items {
        let indent = "  ".repeat(depth);
        let _ = match &item.path {
            Some(path) => writeln!(out, "{indent}{}  {path}", item.title),
            None => writeln!(out, "{indent}{}", item.title),
        };
        render(&item.children, depth + 1, out);
    }
}
