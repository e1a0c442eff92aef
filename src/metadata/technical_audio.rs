//! AudioMD technical metadata

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::{CodecQuality, DataRateMode, MetadataFormat, MetadataType};

/// Round a data rate to an integer string
///
/// Halves round to even, so `"2.5"` becomes `"2"`.
pub(crate) fn normalize_data_rate(data_rate: &str) -> MetsResult<String> {
    let value: f64 = data_rate.trim().parse().map_err(|_| {
        MetsError::InvalidMetadata(format!("data rate '{}' is not a number", data_rate))
    })?;
    if !value.is_finite() {
        return Err(MetsError::InvalidMetadata(format!(
            "data rate '{}' is not a finite number",
            data_rate
        )));
    }
    Ok(format!("{}", value.round_ties_even() as i64))
}

/// Technical metadata of an audio file or stream
///
/// Unknown values are given as `(:unav)`, or `0` for numeric fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalAudioMetadata {
    /// Lossless or lossy
    pub codec_quality: CodecQuality,
    /// Fixed or variable data rate
    pub data_rate_mode: DataRateMode,
    /// Audio data encoding, e.g. `PCM`
    pub audio_data_encoding: String,
    /// Bits per sample, e.g. `16`
    pub bits_per_sample: String,
    /// Application that created the codec
    pub codec_creator_app: String,
    /// Version of the codec creator application
    pub codec_creator_app_version: String,
    /// Codec name
    pub codec_name: String,
    /// Data rate in kbps; rounded to an integer
    pub data_rate: String,
    /// Sampling frequency in kHz
    pub sampling_frequency: String,
    /// Duration in ISO 8601 syntax
    pub duration: String,
    /// Number of channels
    pub num_channels: String,
}

impl MetadataFields for TechnicalAudioMetadata {
    fn kind(&self) -> &'static str {
        "technical-audio"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Technical
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::Other
    }

    fn other_format(&self) -> Option<&str> {
        Some("AudioMD")
    }

    fn format_version(&self) -> &str {
        "2.0"
    }

    fn validate(&self) -> MetsResult<()> {
        normalize_data_rate(&self.data_rate).map(|_| ())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        let data_rate = normalize_data_rate(&self.data_rate).unwrap_or_else(|_| self.data_rate.clone());
        key.field("codec_quality", self.codec_quality.as_str())
            .field("data_rate_mode", self.data_rate_mode.as_str())
            .field("audio_data_encoding", &self.audio_data_encoding)
            .field("bits_per_sample", &self.bits_per_sample)
            .field("codec_creator_app", &self.codec_creator_app)
            .field("codec_creator_app_version", &self.codec_creator_app_version)
            .field("codec_name", &self.codec_name)
            .field("data_rate", data_rate)
            .field("sampling_frequency", &self.sampling_frequency)
            .field("duration", &self.duration)
            .field("num_channels", &self.num_channels);
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        let data_rate = normalize_data_rate(&self.data_rate)?;

        w.start("audiomd:AUDIOMD", [("ANALOGDIGITALFLAG", "FileDigital")])?;
        w.start("audiomd:fileData", NO_ATTRS)?;
        w.text_element("audiomd:audioDataEncoding", &self.audio_data_encoding)?;
        w.text_element("audiomd:bitsPerSample", &self.bits_per_sample)?;
        w.start("audiomd:compression", NO_ATTRS)?;
        w.text_element("audiomd:codecCreatorApp", &self.codec_creator_app)?;
        w.text_element("audiomd:codecCreatorAppVersion", &self.codec_creator_app_version)?;
        w.text_element("audiomd:codecName", &self.codec_name)?;
        w.text_element("audiomd:codecQuality", self.codec_quality.as_str())?;
        w.end("audiomd:compression")?;
        w.text_element("audiomd:dataRate", &data_rate)?;
        w.text_element("audiomd:dataRateMode", self.data_rate_mode.as_str())?;
        w.text_element("audiomd:samplingFrequency", &self.sampling_frequency)?;
        w.end("audiomd:fileData")?;
        w.start("audiomd:audioInfo", NO_ATTRS)?;
        w.text_element("audiomd:duration", &self.duration)?;
        w.text_element("audiomd:numChannels", &self.num_channels)?;
        w.end("audiomd:audioInfo")?;
        w.end("audiomd:AUDIOMD")
    }
}
