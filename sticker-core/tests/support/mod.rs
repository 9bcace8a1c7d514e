//! In-memory source tree with fault injection.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Receiver;

use sticker_core::{SourceEntry, SourceRepo};

const MEM_ROOT: &str = "/mem";

#[derive(Clone)]
enum Kind {
    File(Vec<u8>),
    Dir,
}

#[derive(Clone)]
struct Node {
    parent: Option<usize>,
    name: String,
    rel: String,
    kind: Kind,
}

#[derive(Clone, Copy)]
enum ReadFault {
    /// Fails opening the stream.
    Open(io::ErrorKind),
    /// Serves a few bytes, then fails.
    MidStream,
}

/// Nodes are addressed by index, so duplicate names are allowed the way
/// platform document trees allow them.
#[derive(Default)]
pub struct MemSource {
    nodes: Vec<Node>,
    read_faults: Vec<(String, ReadFault)>,
    list_faults: BTreeSet<String>,
    gate: Option<Mutex<Receiver<()>>>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `rel` ("a.png" or "Pack/a.png"), creating the pack if needed.
    pub fn file(mut self, rel: &str, bytes: &[u8]) -> Self {
        let (parent, name) = self.parent_of(rel);
        self.nodes.push(Node {
            parent,
            name: name.to_string(),
            rel: rel.to_string(),
            kind: Kind::File(bytes.to_vec()),
        });
        self
    }

    pub fn dir(mut self, rel: &str) -> Self {
        self.ensure_dir(rel);
        self
    }

    pub fn fail_open(mut self, rel: &str, kind: io::ErrorKind) -> Self {
        self.read_faults.push((rel.to_string(), ReadFault::Open(kind)));
        self
    }

    pub fn fail_mid_stream(mut self, rel: &str) -> Self {
        self.read_faults.push((rel.to_string(), ReadFault::MidStream));
        self
    }

    pub fn fail_list(mut self, rel: &str) -> Self {
        self.list_faults.insert(rel.to_string());
        self
    }

    /// Every open takes two messages from `gate` (arrived, then proceed);
    /// dropping the sender lets all opens through.
    pub fn gated(mut self, gate: Receiver<()>) -> Self {
        self.gate = Some(Mutex::new(gate));
        self
    }

    fn parent_of<'r>(&mut self, rel: &'r str) -> (Option<usize>, &'r str) {
        match rel.rsplit_once('/') {
            Some((dir, name)) => (Some(self.ensure_dir(dir)), name),
            None => (None, rel),
        }
    }

    fn ensure_dir(&mut self, rel: &str) -> usize {
        if let Some(i) = self
            .nodes
            .iter()
            .position(|n| n.rel == rel && matches!(n.kind, Kind::Dir))
        {
            return i;
        }
        let (parent, name) = self.parent_of(rel);
        self.nodes.push(Node {
            parent,
            name: name.to_string(),
            rel: rel.to_string(),
            kind: Kind::Dir,
        });
        self.nodes.len() - 1
    }

    fn index_of(location: &Path) -> Option<usize> {
        location
            .strip_prefix(MEM_ROOT)
            .ok()
            .and_then(|p| p.to_str())
            .and_then(|s| s.parse().ok())
    }

    fn entry(&self, i: usize) -> SourceEntry {
        let node = &self.nodes[i];
        SourceEntry {
            name: node.name.clone(),
            is_dir: matches!(node.kind, Kind::Dir),
            location: Path::new(MEM_ROOT).join(i.to_string()),
        }
    }
}

struct MidStreamReader {
    head: Cursor<Vec<u8>>,
}

impl Read for MidStreamReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.head.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::Other, "storage went away")),
            n => Ok(n),
        }
    }
}

impl SourceRepo for MemSource {
    fn root(&self) -> SourceEntry {
        SourceEntry::dir("mem", MEM_ROOT)
    }

    fn list_children(&self, dir: &SourceEntry) -> io::Result<Vec<SourceEntry>> {
        let parent = Self::index_of(&dir.location);
        let rel = parent.map(|i| self.nodes[i].rel.as_str()).unwrap_or("");
        if self.list_faults.contains(rel) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok((0..self.nodes.len())
            .filter(|&i| self.nodes[i].parent == parent)
            .map(|i| self.entry(i))
            .collect())
    }

    fn open_reader(&self, entry: &SourceEntry) -> io::Result<Box<dyn Read + Send + '_>> {
        if let Some(gate) = &self.gate {
            if let Ok(rx) = gate.lock() {
                let _ = rx.recv();
                let _ = rx.recv();
            }
        }
        let i = Self::index_of(&entry.location)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let node = &self.nodes[i];
        let Kind::File(bytes) = &node.kind else {
            return Err(io::Error::new(io::ErrorKind::Other, "is a directory"));
        };
        match self.read_faults.iter().find(|(rel, _)| *rel == node.rel) {
            Some((_, ReadFault::Open(kind))) => Err(io::Error::from(*kind)),
            Some((_, ReadFault::MidStream)) => Ok(Box::new(MidStreamReader {
                head: Cursor::new(bytes.iter().copied().take(4).collect()),
            })),
            None => Ok(Box::new(Cursor::new(bytes.clone()))),
        }
    }
}

/// All regular files under `root`, as sorted `/`-separated relative paths.
pub fn files_under(root: &Path) -> Vec<String> {
    let mut out: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    out.sort();
    out
}

pub fn write_tree(root: &Path, files: &[&str]) -> io::Result<PathBuf> {
    for rel in files {
        let p = root.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&p, rel.as_bytes())?;
    }
    Ok(root.to_path_buf())
}
