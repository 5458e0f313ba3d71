//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Secret values never pass
//! through here.

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of decrypted key names with masked values.
pub fn print_keys_table(pairs: &[(String, String)]) {
    if pairs.is_empty() {
        info("The artifact decrypted but holds no variables.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value"]);

    for (key, value) in pairs {
        table.add_row(vec![key.clone(), mask(value)]);
    }

    println!("{table}");
}

/// Replace a value with a fixed-width placeholder and its length.
fn mask(value: &str) -> String {
    format!("******** ({} chars)", value.chars().count())
}
