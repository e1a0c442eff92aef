//! Structural maps and their div trees

use crate::core::content_key::ContentKey;
use crate::core::error::{MetsError, MetsResult};
use crate::core::identifier::is_printable_ascii;
use crate::metadata::Metadata;
use crate::structure::handle::DigitalObjectHandle;
use std::collections::HashSet;

/// A division in a structural map
///
/// Metadata added to a div applies to every digital object below it. Child
/// divs are owned, so the tree is acyclic; digital objects are shared handles.
#[derive(Debug, Clone)]
pub struct StructuralMapDiv {
    div_type: String,
    order: Option<u32>,
    label: Option<String>,
    orderlabel: Option<String>,
    metadata: Vec<Metadata>,
    divs: Vec<StructuralMapDiv>,
    digital_objects: Vec<DigitalObjectHandle>,
}

impl StructuralMapDiv {
    /// Empty div of the given type, e.g. `chapter` or `directory`
    pub fn new(div_type: impl Into<String>) -> Self {
        Self {
            div_type: div_type.into(),
            order: None,
            label: None,
            orderlabel: None,
            metadata: Vec::new(),
            divs: Vec::new(),
            digital_objects: Vec::new(),
        }
    }

    /// Numeric position among siblings (`ORDER`)
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Label shown to users (`LABEL`)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Native numbering such as `xii` (`ORDERLABEL`)
    pub fn with_orderlabel(mut self, orderlabel: impl Into<String>) -> Self {
        self.orderlabel = Some(orderlabel.into());
        self
    }

    /// Div type
    pub fn div_type(&self) -> &str {
        &self.div_type
    }

    /// `ORDER` attribute
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    /// `LABEL` attribute
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `ORDERLABEL` attribute
    pub fn orderlabel(&self) -> Option<&str> {
        self.orderlabel.as_deref()
    }

    /// Metadata in insertion order
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Child divs in insertion order
    pub fn divs(&self) -> &[StructuralMapDiv] {
        &self.divs
    }

    /// Mutable access to the child divs
    pub fn divs_mut(&mut self) -> &mut [StructuralMapDiv] {
        &mut self.divs
    }

    /// Digital objects placed directly in this div
    pub fn digital_objects(&self) -> &[DigitalObjectHandle] {
        &self.digital_objects
    }

    /// Append metadata of any type
    ///
    /// Entries whose content key is already present on this div are ignored.
    pub fn add_metadata<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Metadata>,
    {
        for entry in entries {
            if !self.metadata.contains(&entry) {
                self.metadata.push(entry);
            }
        }
    }

    /// Append child divs
    ///
    /// Fails without adding anything if a digital object would then appear
    /// twice in this div's subtree.
    pub fn add_divs<I>(&mut self, divs: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = StructuralMapDiv>,
    {
        let divs: Vec<StructuralMapDiv> = divs.into_iter().collect();
        let mut seen: HashSet<DigitalObjectHandle> = self.nested_digital_objects().into_iter().collect();
        for div in &divs {
            for object in div.nested_digital_objects() {
                if !seen.insert(object.clone()) {
                    return Err(MetsError::InvalidStructure(format!(
                        "added div contains digital object '{}' that already exists in the div tree",
                        object.read().path()
                    )));
                }
            }
        }
        self.divs.extend(divs);
        Ok(())
    }

    /// Append digital objects
    ///
    /// Fails without adding anything if an object is already in this div's
    /// subtree or is given twice.
    pub fn add_digital_objects<I>(&mut self, objects: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = DigitalObjectHandle>,
    {
        let objects: Vec<DigitalObjectHandle> = objects.into_iter().collect();
        let mut seen: HashSet<DigitalObjectHandle> = self.nested_digital_objects().into_iter().collect();
        for object in &objects {
            if !seen.insert(object.clone()) {
                return Err(MetsError::InvalidStructure(format!(
                    "digital object '{}' already exists in the div tree",
                    object.read().path()
                )));
            }
        }
        self.digital_objects.extend(objects);
        Ok(())
    }

    /// This div and every nested div, depth-first pre-order
    pub fn iter_divs(&self) -> Vec<&StructuralMapDiv> {
        let mut out = vec![self];
        for div in &self.divs {
            out.extend(div.iter_divs());
        }
        out
    }

    /// Digital objects in this div and every nested div, depth-first
    ///
    /// An object placed twice is listed twice.
    pub fn nested_digital_objects(&self) -> Vec<DigitalObjectHandle> {
        let mut out = self.digital_objects.clone();
        for div in &self.divs {
            out.extend(div.nested_digital_objects());
        }
        out
    }

    /// Hoist metadata shared by every child up to this div, bottom-up
    ///
    /// Children are the sub-divs and the directly placed digital objects. A
    /// non-technical record carried by all of them (at least two) moves to
    /// this div and is removed from the child divs. An event moves only when
    /// each agent it links to moves with it or is already on this div or one
    /// of its ancestors.
    pub fn bundle_metadata(&mut self) {
        self.bundle_metadata_with(&HashSet::new());
    }

    /// `above` holds the content keys carried by the ancestors of this div
    fn bundle_metadata_with(&mut self, above: &HashSet<ContentKey>) {
        let mut inherited = above.clone();
        inherited.extend(self.metadata.iter().map(|m| m.content_key().clone()));
        for div in &mut self.divs {
            div.bundle_metadata_with(&inherited);
        }

        let child_count = self.divs.len() + self.digital_objects.len();
        if child_count < 2 {
            return;
        }

        let child_keys: Vec<HashSet<ContentKey>> = self
            .divs
            .iter()
            .map(|div| non_technical_keys(&div.metadata))
            .chain(
                self.digital_objects
                    .iter()
                    .map(|object| object.read_with(|o| non_technical_keys(o.metadata()))),
            )
            .collect();

        // Objects carry only technical metadata, so an all-object level has nothing to hoist
        let Some(first) = self.divs.first() else {
            return;
        };

        let mut candidates: Vec<Metadata> = first
            .metadata
            .iter()
            .filter(|m| !m.is_technical())
            .filter(|m| child_keys.iter().all(|keys| keys.contains(m.content_key())))
            .cloned()
            .collect();
        if candidates.is_empty() {
            return;
        }

        let mut hoisted = inherited;
        hoisted.extend(candidates.iter().map(|m| m.content_key().clone()));
        candidates.retain(|m| {
            let complete = m
                .linked_agents()
                .iter()
                .all(|link| hoisted.contains(link.metadata().content_key()));
            if !complete {
                tracing::debug!(
                    key = %m.content_key(),
                    div_type = %self.div_type,
                    "event stays below; a linked agent is neither shared by all children nor on an ancestor"
                );
            }
            complete
        });
        if candidates.is_empty() {
            return;
        }

        let moved: HashSet<ContentKey> = candidates.iter().map(|m| m.content_key().clone()).collect();
        for div in &mut self.divs {
            div.metadata.retain(|m| !moved.contains(m.content_key()));
        }
        tracing::trace!(count = moved.len(), div_type = %self.div_type, "bundled metadata");
        self.add_metadata(candidates);
    }
}

fn non_technical_keys(metadata: &[Metadata]) -> HashSet<ContentKey> {
    metadata
        .iter()
        .filter(|m| !m.is_technical())
        .map(|m| m.content_key().clone())
        .collect()
}

/// A structural map (`mets:structMap`) with exactly one root div
#[derive(Debug, Clone)]
pub struct StructuralMap {
    root_div: StructuralMapDiv,
    structural_map_type: Option<String>,
    label: Option<String>,
    pid: Option<(String, String)>,
}

impl StructuralMap {
    /// Structural map with the given root div
    pub fn new(root_div: StructuralMapDiv) -> Self {
        Self {
            root_div,
            structural_map_type: None,
            label: None,
            pid: None,
        }
    }

    /// `TYPE` attribute, e.g. `logical` or `physical`
    pub fn with_type(mut self, structural_map_type: impl Into<String>) -> Self {
        self.structural_map_type = Some(structural_map_type.into());
        self
    }

    /// `LABEL` attribute
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Persistent identifier (`fi:PID`) and its type (`fi:PIDTYPE`)
    ///
    /// Both must be non-empty printable US-ASCII.
    pub fn with_pid(mut self, pid: impl Into<String>, pid_type: impl Into<String>) -> MetsResult<Self> {
        let pid = pid.into();
        let pid_type = pid_type.into();
        for (name, value) in [("pid", &pid), ("pid_type", &pid_type)] {
            if !is_printable_ascii(value) {
                return Err(MetsError::InvalidValue(format!(
                    "{} '{}' must be non-empty printable US-ASCII",
                    name, value
                )));
            }
        }
        self.pid = Some((pid, pid_type));
        Ok(self)
    }

    /// Root div
    pub fn root_div(&self) -> &StructuralMapDiv {
        &self.root_div
    }

    /// Mutable root div
    pub fn root_div_mut(&mut self) -> &mut StructuralMapDiv {
        &mut self.root_div
    }

    /// `TYPE` attribute
    pub fn structural_map_type(&self) -> Option<&str> {
        self.structural_map_type.as_deref()
    }

    /// `LABEL` attribute
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `fi:PID` attribute
    pub fn pid(&self) -> Option<&str> {
        self.pid.as_ref().map(|(pid, _)| pid.as_str())
    }

    /// `fi:PIDTYPE` attribute
    pub fn pid_type(&self) -> Option<&str> {
        self.pid.as_ref().map(|(_, pid_type)| pid_type.as_str())
    }

    /// Add metadata describing the whole map; it goes on the root div
    pub fn add_metadata<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Metadata>,
    {
        self.root_div.add_metadata(entries);
    }

    /// Bundle metadata over the whole tree
    pub fn bundle_metadata(&mut self) {
        self.root_div.bundle_metadata();
    }

    /// Every div, depth-first pre-order
    pub fn iter_divs(&self) -> Vec<&StructuralMapDiv> {
        self.root_div.iter_divs()
    }

    /// Every digital object placed in the tree
    pub fn digital_objects(&self) -> Vec<DigitalObjectHandle> {
        self.root_div.nested_digital_objects()
    }
}
