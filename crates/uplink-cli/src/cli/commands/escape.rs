//! `uplink escape <path>` – percent-encode a path.

use uplink_core::upload_path::escape_path;

pub fn run_escape(path: &str) {
    println!("{}", escape_path(path));
}
