//! Shared helpers for reading produced EPUBs back.

#![allow(dead_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

pub fn open(path: &Path) -> ZipArchive<File> {
    ZipArchive::new(File::open(path).expect("open epub")).expect("read zip")
}

pub fn entry(path: &Path, name: &str) -> String {
    let mut archive = open(path);
    let mut file = archive.by_name(name).expect("entry present");
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

pub fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = open(path);
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// `idref`s of the OPF spine, in order.
pub fn spine(path: &Path) -> Vec<String> {
    let opf = entry(path, "OEBPS/content.opf");
    opf.split("<itemref idref=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}
