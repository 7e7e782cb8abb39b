use derive_new::new;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone, new)]
pub struct PackageSpec {
    pub name: String,
    pub entries: Vec<(String, Vec<u8>)>,
}

impl PackageSpec {
    pub fn with_parts(name: &str, parts: &[(&str, &str)]) -> Self {
        let entries = parts
            .iter()
            .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec()))
            .collect();
        PackageSpec::new(name.to_string(), entries)
    }

    pub fn with_entry(mut self, path: &str, content: &[u8]) -> Self {
        self.entries.push((path.to_string(), content.to_vec()));
        self
    }
}

/// Write `spec` as a zip archive into `dir`, returning its path
pub fn write_package(dir: &Path, spec: &PackageSpec) -> PathBuf {
    let path = dir.join(&spec.name);
    let file = File::create(&path)
        .unwrap_or_else(|e| panic!("Failed to create package {:?}: {}", path, e));

    let mut writer = ZipWriter::new(file);
    for (entry, content) in &spec.entries {
        writer
            .start_file(entry.as_str(), SimpleFileOptions::default())
            .unwrap_or_else(|e| panic!("Failed to start entry {}: {}", entry, e));
        writer
            .write_all(content)
            .unwrap_or_else(|e| panic!("Failed to write entry {}: {}", entry, e));
    }
    writer
        .finish()
        .unwrap_or_else(|e| panic!("Failed to finish package {:?}: {}", path, e));

    path
}

/// Random but well-formed parts, each `<w:p>` holding a few generated words
pub fn generated_parts(count: usize) -> Vec<(String, String)> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..count)
        .map(|n| {
            let path = format!("word/{}{n}.xml", Word().fake::<String>());
            let content = format!(
                "<w:document><w:body><w:p><w:t>{}</w:t></w:p></w:body></w:document>",
                Words(3..8).fake::<Vec<String>>().join(" ")
            );
            (path, content)
        })
        .collect()
}
