//! NISO MIX still image metadata

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::vocabulary::UNAV;
use crate::types::{MetadataFormat, MetadataType};

/// Technical metadata of a still image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalImageMetadata {
    /// Compression scheme, e.g. `jpeg`
    pub compression: String,
    /// Color space, e.g. `srgb`
    pub colorspace: String,
    /// Width in pixels
    pub width: String,
    /// Height in pixels
    pub height: String,
    /// Bits per sample, e.g. `8,8,8`
    pub bps_value: String,
    /// Unit of the bits per sample value
    pub bps_unit: String,
    /// Samples per pixel
    pub samples_per_pixel: String,
    /// Mimetype of the image
    pub mimetype: Option<String>,
    /// Byte order, required for TIFF images
    pub byte_order: Option<String>,
    /// Name of the embedded ICC profile
    pub icc_profile_name: Option<String>,
}

impl TechnicalImageMetadata {
    /// Image metadata with the required fields
    pub fn new(
        compression: impl Into<String>,
        colorspace: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
        bps_value: impl Into<String>,
        bps_unit: impl Into<String>,
        samples_per_pixel: impl Into<String>,
    ) -> Self {
        Self {
            compression: compression.into(),
            colorspace: colorspace.into(),
            width: width.into(),
            height: height.into(),
            bps_value: bps_value.into(),
            bps_unit: bps_unit.into(),
            samples_per_pixel: samples_per_pixel.into(),
            mimetype: None,
            byte_order: None,
            icc_profile_name: None,
        }
    }

    /// Set the mimetype
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Set the byte order
    pub fn with_byte_order(mut self, byte_order: impl Into<String>) -> Self {
        self.byte_order = Some(byte_order.into());
        self
    }

    /// Set the ICC profile name
    pub fn with_icc_profile_name(mut self, name: impl Into<String>) -> Self {
        self.icc_profile_name = Some(name.into());
        self
    }
}

fn is_missing(value: Option<&str>) -> bool {
    matches!(value, None | Some("") | Some(UNAV))
}

impl MetadataFields for TechnicalImageMetadata {
    fn kind(&self) -> &'static str {
        "technical-image"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Technical
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::Nisoimg
    }

    fn format_version(&self) -> &str {
        "2.0"
    }

    fn validate(&self) -> MetsResult<()> {
        let required = [
            ("compression", &self.compression),
            ("colorspace", &self.colorspace),
            ("width", &self.width),
            ("height", &self.height),
            ("bps_value", &self.bps_value),
            ("bps_unit", &self.bps_unit),
            ("samples_per_pixel", &self.samples_per_pixel),
        ];
        for (name, value) in required {
            if is_missing(Some(value.as_str())) {
                return Err(MetsError::InvalidMetadata(format!(
                    "missing image metadata value for '{}', given value was '{}'",
                    name, value
                )));
            }
        }
        if self.mimetype.as_deref() == Some("image/tiff") && is_missing(self.byte_order.as_deref()) {
            return Err(MetsError::InvalidMetadata(
                "byte order missing from TIFF image metadata".to_string(),
            ));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.field("compression", &self.compression)
            .field("colorspace", &self.colorspace)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bps_value", &self.bps_value)
            .field("bps_unit", &self.bps_unit)
            .field("samples_per_pixel", &self.samples_per_pixel)
            .opt_field("mimetype", self.mimetype.as_deref())
            .opt_field("byte_order", self.byte_order.as_deref())
            .opt_field("icc_profile_name", self.icc_profile_name.as_deref());
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        w.start("mix:mix", NO_ATTRS)?;

        w.start("mix:BasicDigitalObjectInformation", NO_ATTRS)?;
        w.opt_text_element("mix:byteOrder", self.byte_order.as_deref())?;
        w.start("mix:Compression", NO_ATTRS)?;
        w.text_element("mix:compressionScheme", &self.compression)?;
        w.end("mix:Compression")?;
        w.end("mix:BasicDigitalObjectInformation")?;

        w.start("mix:BasicImageInformation", NO_ATTRS)?;
        w.start("mix:BasicImageCharacteristics", NO_ATTRS)?;
        w.text_element("mix:imageWidth", &self.width)?;
        w.text_element("mix:imageHeight", &self.height)?;
        w.start("mix:PhotometricInterpretation", NO_ATTRS)?;
        w.text_element("mix:colorSpace", &self.colorspace)?;
        if let Some(icc) = self.icc_profile_name.as_deref().filter(|v| !is_missing(Some(*v))) {
            w.start("mix:ColorProfile", NO_ATTRS)?;
            w.start("mix:IccProfile", NO_ATTRS)?;
            w.text_element("mix:iccProfileName", icc)?;
            w.end("mix:IccProfile")?;
            w.end("mix:ColorProfile")?;
        }
        w.end("mix:PhotometricInterpretation")?;
        w.end("mix:BasicImageCharacteristics")?;
        w.end("mix:BasicImageInformation")?;

        w.start("mix:ImageAssessmentMetadata", NO_ATTRS)?;
        w.start("mix:ImageColorEncoding", NO_ATTRS)?;
        w.start("mix:BitsPerSample", NO_ATTRS)?;
        w.text_element("mix:bitsPerSampleValue", &self.bps_value)?;
        w.text_element("mix:bitsPerSampleUnit", &self.bps_unit)?;
        w.end("mix:BitsPerSample")?;
        w.text_element("mix:samplesPerPixel", &self.samples_per_pixel)?;
        w.end("mix:ImageColorEncoding")?;
        w.end("mix:ImageAssessmentMetadata")?;

        w.end("mix:mix")
    }
}
