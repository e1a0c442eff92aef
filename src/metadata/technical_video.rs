//! VideoMD technical metadata

use super::technical_audio::normalize_data_rate;
use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::MetsResult;
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::{CodecQuality, Color, DataRateMode, MetadataFormat, MetadataType, Sound};

/// Technical metadata of a video file or stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalVideoMetadata {
    /// Duration in ISO 8601 syntax
    pub duration: String,
    /// Data rate in mbps; rounded to an integer
    pub data_rate: String,
    /// Bits per sample
    pub bits_per_sample: String,
    /// Color of the video
    pub color: Color,
    /// Application that created the codec
    pub codec_creator_app: String,
    /// Version of the codec creator application
    pub codec_creator_app_version: String,
    /// Codec name
    pub codec_name: String,
    /// Lossless or lossy
    pub codec_quality: CodecQuality,
    /// Fixed or variable data rate
    pub data_rate_mode: DataRateMode,
    /// Frame rate, e.g. `29.970`
    pub frame_rate: String,
    /// Horizontal resolution in pixels
    pub pixels_horizontal: String,
    /// Vertical resolution in pixels
    pub pixels_vertical: String,
    /// Pixel aspect ratio
    pub par: String,
    /// Display aspect ratio
    pub dar: String,
    /// Chroma sampling, e.g. `4:2:0`
    pub sampling: String,
    /// Signal format, e.g. `PAL`
    pub signal_format: String,
    /// Whether the video has sound
    pub sound: Sound,
}

impl MetadataFields for TechnicalVideoMetadata {
    fn kind(&self) -> &'static str {
        "technical-video"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Technical
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::Other
    }

    fn other_format(&self) -> Option<&str> {
        Some("VideoMD")
    }

    fn format_version(&self) -> &str {
        "2.0"
    }

    fn validate(&self) -> MetsResult<()> {
        normalize_data_rate(&self.data_rate).map(|_| ())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        let data_rate = normalize_data_rate(&self.data_rate).unwrap_or_else(|_| self.data_rate.clone());
        key.field("duration", &self.duration)
            .field("data_rate", data_rate)
            .field("bits_per_sample", &self.bits_per_sample)
            .field("color", self.color.as_str())
            .field("codec_creator_app", &self.codec_creator_app)
            .field("codec_creator_app_version", &self.codec_creator_app_version)
            .field("codec_name", &self.codec_name)
            .field("codec_quality", self.codec_quality.as_str())
            .field("data_rate_mode", self.data_rate_mode.as_str())
            .field("frame_rate", &self.frame_rate)
            .field("pixels_horizontal", &self.pixels_horizontal)
            .field("pixels_vertical", &self.pixels_vertical)
            .field("par", &self.par)
            .field("dar", &self.dar)
            .field("sampling", &self.sampling)
            .field("signal_format", &self.signal_format)
            .field("sound", self.sound.as_str());
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        let data_rate = normalize_data_rate(&self.data_rate)?;

        w.start("videomd:VIDEOMD", [("ANALOGDIGITALFLAG", "FileDigital")])?;
        w.start("videomd:fileData", NO_ATTRS)?;
        w.text_element("videomd:duration", &self.duration)?;
        w.text_element("videomd:dataRate", &data_rate)?;
        w.text_element("videomd:bitsPerSample", &self.bits_per_sample)?;
        w.text_element("videomd:color", self.color.as_str())?;
        w.start("videomd:compression", NO_ATTRS)?;
        w.text_element("videomd:codecCreatorApp", &self.codec_creator_app)?;
        w.text_element("videomd:codecCreatorAppVersion", &self.codec_creator_app_version)?;
        w.text_element("videomd:codecName", &self.codec_name)?;
        w.text_element("videomd:codecQuality", self.codec_quality.as_str())?;
        w.end("videomd:compression")?;
        w.text_element("videomd:dataRateMode", self.data_rate_mode.as_str())?;
        w.text_element("videomd:frameRate", &self.frame_rate)?;
        w.start("videomd:frame", NO_ATTRS)?;
        w.text_element("videomd:pixelsHorizontal", &self.pixels_horizontal)?;
        w.text_element("videomd:pixelsVertical", &self.pixels_vertical)?;
        w.text_element("videomd:PAR", &self.par)?;
        w.text_element("videomd:DAR", &self.dar)?;
        w.end("videomd:frame")?;
        w.text_element("videomd:sampling", &self.sampling)?;
        w.text_element("videomd:signalFormat", &self.signal_format)?;
        w.text_element("videomd:sound", self.sound.as_str())?;
        w.end("videomd:fileData")?;
        w.end("videomd:VIDEOMD")
    }
}
