use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::pixel_format::PixelFormat;

/// A JSON job file: `{ "jobs": [ ... ] }`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobFile {
    pub jobs: Vec<JobConfig>,
}

/// One conversion as the user described it. Format strings are kept raw
/// and only resolved by [`JobConfig::validate`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub input_width: u32,
    pub input_height: u32,
    pub input_format: Option<String>,
    /// Defaults to `input_width`
    #[serde(default)]
    pub output_width: Option<u32>,
    /// Defaults to `input_height`
    #[serde(default)]
    pub output_height: Option<u32>,
    pub output_format: Option<String>,
}

/// A job with resolved formats and checked dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub source: PixelFormat,
    pub destination: PixelFormat,
}

impl JobConfig {
    /// Check everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<ConversionPlan> {
        let input_dims = (self.input_width, self.input_height);
        let output_dims = (
            self.output_width.unwrap_or(self.input_width),
            self.output_height.unwrap_or(self.input_height),
        );
        if input_dims != output_dims {
            return Err(ConvertError::DimensionMismatch {
                input: input_dims,
                output: output_dims,
            });
        }

        if self.input_width == 0 || self.input_height == 0 {
            return Err(ConvertError::EmptyImage {
                width: self.input_width,
                height: self.input_height,
            });
        }

        let input = self.input.clone().ok_or(ConvertError::MissingPath("input"))?;
        let output = self.output.clone().ok_or(ConvertError::MissingPath("output"))?;

        let destination = PixelFormat::parse(self.output_format.as_deref());
        if !destination.is_defined() {
            return Err(ConvertError::UndefinedDestinationFormat);
        }
        let source = PixelFormat::parse(self.input_format.as_deref());
        if !source.is_defined() {
            return Err(ConvertError::UndefinedSourceFormat);
        }
        if source == destination {
            return Err(ConvertError::UnsupportedPair {
                from: source,
                to: destination,
            });
        }

        Ok(ConversionPlan {
            input,
            output,
            width: self.input_width,
            height: self.input_height,
            source,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobConfig {
        JobConfig {
            input: Some("in.rgb".into()),
            output: Some("out.argb".into()),
            input_width: 4,
            input_height: 3,
            input_format: Some("RGB24".into()),
            output_width: None,
            output_height: None,
            output_format: Some("ARGB".into()),
        }
    }

    #[test]
    fn test_valid_job() {
        let plan = job().validate().unwrap();
        assert_eq!(plan.source, PixelFormat::Rgb24);
        assert_eq!(plan.destination, PixelFormat::Argb);
        assert_eq!((plan.width, plan.height), (4, 3));
        assert_eq!(plan.output, PathBuf::from("out.argb"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut config = job();
        config.output_height = Some(4);
        assert!(matches!(
            config.validate(),
            Err(ConvertError::DimensionMismatch {
                input: (4, 3),
                output: (4, 4)
            })
        ));

        // A single matching axis is still a mismatch
        let mut config = job();
        config.output_width = Some(4);
        config.output_height = Some(9);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut config = job();
        config.input_width = 0;
        config.input_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConvertError::EmptyImage { width: 0, height: 0 })
        ));

        let mut config = job();
        config.input_height = 0;
        config.output_height = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConvertError::EmptyImage { width: 4, height: 0 })
        ));
    }

    #[test]
    fn test_missing_paths() {
        let mut config = job();
        config.input = None;
        assert!(matches!(config.validate(), Err(ConvertError::MissingPath("input"))));

        let mut config = job();
        config.output = None;
        assert!(matches!(config.validate(), Err(ConvertError::MissingPath("output"))));
    }

    #[test]
    fn test_undefined_formats() {
        let mut config = job();
        config.output_format = Some("argb".into());
        assert!(matches!(config.validate(), Err(ConvertError::UndefinedDestinationFormat)));

        let mut config = job();
        config.output_format = None;
        assert!(matches!(config.validate(), Err(ConvertError::UndefinedDestinationFormat)));

        let mut config = job();
        config.input_format = Some("YUY2".into());
        assert!(matches!(config.validate(), Err(ConvertError::UndefinedSourceFormat)));
    }

    #[test]
    fn test_same_format_rejected() {
        let mut config = job();
        config.output_format = Some("RGB24".into());
        assert!(matches!(config.validate(), Err(ConvertError::UnsupportedPair { .. })));
    }

    #[test]
    fn test_parse_job_file() {
        let json = r#"{
            "jobs": [
                {
                    "input": "a.rgb",
                    "output": "a.ayuv",
                    "input_width": 640,
                    "input_height": 480,
                    "input_format": "RGB24",
                    "output_format": "AYUV"
                },
                {
                    "input": "b.bgra",
                    "output": "b.vuya",
                    "input_width": 2,
                    "input_height": 2,
                    "input_format": "BGRA",
                    "output_width": 2,
                    "output_height": 2,
                    "output_format": "VUYA"
                }
            ]
        }"#;
        let file: JobFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.jobs.len(), 2);

        let first = file.jobs[0].validate().unwrap();
        assert_eq!(first.destination, PixelFormat::Ayuv);
        assert_eq!((first.width, first.height), (640, 480));

        let second = file.jobs[1].validate().unwrap();
        assert_eq!(second.source, PixelFormat::Bgra);
        assert_eq!(second.destination, PixelFormat::Vuya);
    }
}
