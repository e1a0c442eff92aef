//! Controlled vocabularies used by METS documents and their metadata
//!
//! Unknown-value tokens such as `(:unav)` follow the digital preservation
//! vocabulary for unknown values.

/// Not applicable
pub const UNAP: &str = "(:unap)";
/// Value unavailable, possibly unknown
pub const UNAV: &str = "(:unav)";

vocabulary! {
    /// Kind of a metadata record, which decides the section it is written to
    pub enum MetadataType {
        /// Technical metadata (`techMD`)
        Technical => "technical",
        /// Descriptive metadata (`dmdSec`)
        Descriptive => "descriptive",
        /// Digital provenance event (`digiprovMD`)
        DigitalProvenanceEvent => "digital provenance event",
        /// Digital provenance agent (`digiprovMD`)
        DigitalProvenanceAgent => "digital provenance agent",
        /// Intellectual property rights metadata (`rightsMD`)
        Rights => "rights",
        /// Source metadata (`sourceMD`)
        Source => "source",
    }
}

impl MetadataType {
    /// Whether the record belongs in `amdSec`
    pub fn is_administrative(&self) -> bool {
        !self.is_descriptive()
    }

    /// Whether the record belongs in a `dmdSec`
    pub fn is_descriptive(&self) -> bool {
        matches!(self, MetadataType::Descriptive)
    }

    /// Whether the record is digital provenance metadata
    pub fn is_digital_provenance(&self) -> bool {
        matches!(
            self,
            MetadataType::DigitalProvenanceEvent | MetadataType::DigitalProvenanceAgent
        )
    }
}

vocabulary! {
    /// Metadata format, written as `MDTYPE`
    pub enum MetadataFormat {
        /// Machine-Readable Cataloging
        Marc => "MARC",
        /// Metadata Object Description Schema
        Mods => "MODS",
        /// Dublin Core
        Dc => "DC",
        /// Encoded Archival Description
        Ead => "EAD",
        /// Encoded Archival Context for Corporate Bodies, Persons, and Families
        EacCpf => "EAC-CPF",
        /// Lightweight Information Describing Objects
        Lido => "LIDO",
        /// Visual Resources Association
        Vra => "VRA",
        /// Data Documentation Initiative
        Ddi => "DDI",
        /// PREMIS object
        PremisObject => "PREMIS:OBJECT",
        /// NISO still image
        Nisoimg => "NISOIMG",
        /// PREMIS agent
        PremisAgent => "PREMIS:AGENT",
        /// PREMIS event
        PremisEvent => "PREMIS:EVENT",
        /// Any other format, named by `OTHERMDTYPE`
        Other => "OTHER",
    }
}

vocabulary! {
    /// Checksum algorithms accepted for file fixity
    pub enum ChecksumAlgorithm {
        Md5 => "MD5",
        Sha1 => "SHA-1",
        Sha224 => "SHA-224",
        Sha256 => "SHA-256",
        Sha384 => "SHA-384",
        Sha512 => "SHA-512",
    }
}

vocabulary! {
    /// Character encodings of text files
    pub enum Charset {
        Iso8859_15 => "ISO-8859-15",
        Utf8 => "UTF-8",
        Utf16 => "UTF-16",
        Utf32 => "UTF-32",
    }
}

vocabulary! {
    /// PREMIS object category
    pub enum PremisObjectType {
        /// A stand-alone file
        File => "file",
        /// Non stand-alone data within a file
        Bitstream => "bitstream",
    }
}

vocabulary! {
    /// Overall result of a provenance event
    pub enum EventOutcome {
        Success => "success",
        Failure => "failure",
        /// Temporarily inaccessible
        Unaccessible => "(:unac)",
        /// Suppressed intentionally
        Unallowed => "(:unal)",
        /// Not applicable
        Unapplicable => "(:unap)",
        /// Value unavailable
        Unavailable => "(:unav)",
        /// Known to be unknown
        Unknown => "(:unkn)",
        /// Never had a value
        None => "(:none)",
        /// Explicitly empty
        Null => "(:null)",
        /// To be announced
        ToBeAnnounced => "(:tba)",
        /// Too numerous to list
        EtAlia => "(:etal)",
    }
}

vocabulary! {
    /// Type of a provenance agent
    pub enum AgentType {
        Software => "software",
        Hardware => "hardware",
        Person => "person",
        Organization => "organization",
    }
}

impl AgentType {
    /// Software and hardware agents carry a version
    pub fn is_versioned(&self) -> bool {
        matches!(self, AgentType::Software | AgentType::Hardware)
    }
}

vocabulary! {
    /// Video color
    pub enum Color {
        BAndW => "B&W",
        Color => "Color",
        Grayscale => "Grayscale",
        BAndWWithGrayscaleSequences => "B&W with grayscale sequences",
        BAndWWithColorSequences => "B&W with color sequences",
        GrayscaleWithBAndWSequences => "Grayscale with B&W sequences",
        GrayscaleWithColorSequences => "Grayscale with color sequences",
        ColorWithBAndWSequences => "Color with B&W sequences",
        ColorWithGrayscaleSequences => "Color with grayscale sequences",
    }
}

vocabulary! {
    /// Whether a video has sound
    pub enum Sound {
        Yes => "Yes",
        No => "No",
    }
}

vocabulary! {
    /// Codec quality of audio or video
    pub enum CodecQuality {
        Lossless => "lossless",
        Lossy => "lossy",
    }
}

vocabulary! {
    /// Data rate mode of audio or video
    pub enum DataRateMode {
        Fixed => "Fixed",
        Variable => "Variable",
    }
}

vocabulary! {
    /// METS profile of the package, written as `PROFILE`
    pub enum MetsProfile {
        /// Cultural heritage resources
        CulturalHeritage => "https://digitalpreservation.fi/mets-profiles/cultural-heritage",
        /// Research data resources
        ResearchData => "https://digitalpreservation.fi/mets-profiles/research-data",
    }
}

vocabulary! {
    /// Status of the information package, written as `RECORDSTATUS`
    pub enum RecordStatus {
        /// A new submission package
        Submission => "submission",
        /// An updated version of an earlier submission
        Update => "update",
        /// A dissemination package
        Dissemination => "dissemination",
    }
}

vocabulary! {
    /// Role of a METS header agent
    pub enum AgentRole {
        Creator => "CREATOR",
        Editor => "EDITOR",
        Archivist => "ARCHIVIST",
        Preservation => "PRESERVATION",
        Disseminator => "DISSEMINATOR",
        Custodian => "CUSTODIAN",
        /// Intellectual property owner
        IpOwner => "IPOWNER",
        /// Named by `OTHERROLE`
        Other => "OTHER",
    }
}

vocabulary! {
    /// Type of a METS header agent
    pub enum MetsAgentType {
        Individual => "INDIVIDUAL",
        Organization => "ORGANIZATION",
        /// Named by `OTHERTYPE`
        Other => "OTHER",
    }
}
