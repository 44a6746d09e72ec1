//! `uplink classify <value>` – show how a link value is classified.

use uplink_core::upload_path::{classify, UploadReference};

pub fn run_classify(value: &str) {
    println!("{}", describe(&classify(value)));
}

pub(crate) fn describe(r: &UploadReference) -> String {
    let kind = if !r.is_well_formed {
        "malformed"
    } else if r.is_absolute {
        "absolute"
    } else if r.is_upload_path {
        "upload"
    } else {
        "relative"
    };
    match &r.upload_path {
        Some(path) => format!("{kind}\t{path}{}", r.suffix),
        None => kind.to_string(),
    }
}
