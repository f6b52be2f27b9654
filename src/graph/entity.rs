//! Named nodes and typed arcs of the category graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// Dense integer id assigned by the store. Category and page ids live in
/// separate id spaces.
pub type NodeId = u32;

/// An encyclopedia category, identified by its name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category {
    name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An encyclopedia page, identified by its name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Page {
    name: String,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which of the two node kinds an endpoint is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Category,
    Page,
}

impl NodeKind {
    /// Token used by the text record format
    pub fn token(self) -> &'static str {
        match self {
            NodeKind::Category => "cat",
            NodeKind::Page => "page",
        }
    }
}

impl FromStr for NodeKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cat" => Ok(NodeKind::Category),
            "page" => Ok(NodeKind::Page),
            other => Err(RecordError::UnknownNodeKind(other.to_string())),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The four relations between categories and pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArchKind {
    /// Category is a subcategory of another category
    CsubC,
    /// Category is a supercategory of another category
    CsupC,
    /// Category contains a page
    CP,
    /// Page belongs to a category
    PC,
}

impl ArchKind {
    /// All kinds in dump order
    pub const ALL: [ArchKind; 4] = [ArchKind::CsubC, ArchKind::CsupC, ArchKind::CP, ArchKind::PC];

    pub fn token(self) -> &'static str {
        match self {
            ArchKind::CsubC => "CsubC",
            ArchKind::CsupC => "CsupC",
            ArchKind::CP => "CP",
            ArchKind::PC => "PC",
        }
    }

    /// Node kind required at the origin of an arch of this kind
    pub fn origin_kind(self) -> NodeKind {
        match self {
            ArchKind::CsubC | ArchKind::CsupC | ArchKind::CP => NodeKind::Category,
            ArchKind::PC => NodeKind::Page,
        }
    }

    /// Node kind required at the destiny of an arch of this kind
    pub fn destiny_kind(self) -> NodeKind {
        match self {
            ArchKind::CsubC | ArchKind::CsupC | ArchKind::PC => NodeKind::Category,
            ArchKind::CP => NodeKind::Page,
        }
    }
}

impl FromStr for ArchKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CsubC" => Ok(ArchKind::CsubC),
            "CsupC" => Ok(ArchKind::CsupC),
            "CP" => Ok(ArchKind::CP),
            "PC" => Ok(ArchKind::PC),
            other => Err(RecordError::UnknownRelation(other.to_string())),
        }
    }
}

impl fmt::Display for ArchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A directed, typed edge between two node ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arch {
    pub origin: NodeId,
    pub destiny: NodeId,
    pub kind: ArchKind,
}

impl Arch {
    pub fn new(origin: NodeId, destiny: NodeId, kind: ArchKind) -> Self {
        Self {
            origin,
            destiny,
            kind,
        }
    }
}
