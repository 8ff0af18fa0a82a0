// ── Splash screen configuration record ────────────────────────────────────────
//
// The host bundles an 8-byte RT_RCDATA resource that selects the splash
// behaviour.  Layout (little-endian):
//
//   offset 0  u32  discriminant (0 = none, 1 = bitmap resource)
//   offset 4  u16  bitmap resource id
//   offset 6  u16  padding
//
// No Win32 imports; the record arrives here as plain bytes.

use crate::error::{Result, SplashError};

/// Resource id of the configuration record in the host module.
pub const CONFIGURATION_RESOURCE_ID: u16 = 1;

/// Exact size of the configuration record in bytes.
pub const CONFIGURATION_RECORD_SIZE: usize = 8;

/// Raw discriminant value for "no splash screen".
pub const TYPE_NONE: u32 = 0;

/// Raw discriminant value for "show a bitmap resource".
pub const TYPE_BITMAP_RESOURCE: u32 = 1;

/// What kind of splash screen the host asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashType {
    /// Splash screens are disabled for this host.
    None,
    /// Show the bitmap resource with the given id.
    BitmapResource(u16),
}

/// The decoded configuration record.
///
/// The discriminant is kept exactly as read so that an unknown value can be
/// reported with its number when the controller acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashConfiguration {
    raw_type: u32,
    resource_id: u16,
}

impl SplashConfiguration {
    /// Build a record from its parts.
    pub fn new(raw_type: u32, resource_id: u16) -> Self {
        Self { raw_type, resource_id }
    }

    /// Decode a record read from resources.
    ///
    /// A length other than [`CONFIGURATION_RECORD_SIZE`] is fatal.
    pub fn from_record(bytes: &[u8]) -> Result<Self> {
        let record: &[u8; CONFIGURATION_RECORD_SIZE] =
            bytes.try_into().map_err(|_| SplashError::ConfigurationSize {
                expected: CONFIGURATION_RECORD_SIZE,
                actual: bytes.len(),
            })?;

        Ok(Self {
            raw_type: u32::from_le_bytes([record[0], record[1], record[2], record[3]]),
            resource_id: u16::from_le_bytes([record[4], record[5]]),
        })
    }

    /// Encode into the on-resource layout.
    pub fn to_record(self) -> [u8; CONFIGURATION_RECORD_SIZE] {
        let mut out = [0u8; CONFIGURATION_RECORD_SIZE];
        out[..4].copy_from_slice(&self.raw_type.to_le_bytes());
        out[4..6].copy_from_slice(&self.resource_id.to_le_bytes());
        out
    }

    pub fn raw_type(&self) -> u32 {
        self.raw_type
    }

    pub fn resource_id(&self) -> u16 {
        self.resource_id
    }

    /// Interpret the discriminant.
    pub fn splash_type(&self) -> Result<SplashType> {
        match self.raw_type {
            TYPE_NONE => Ok(SplashType::None),
            TYPE_BITMAP_RESOURCE => Ok(SplashType::BitmapResource(self.resource_id)),
            other => Err(SplashError::InvalidConfiguration(other)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bitmap_record() {
        let cfg = SplashConfiguration::from_record(&[1, 0, 0, 0, 0x2A, 0x01, 0, 0]).unwrap();
        assert_eq!(cfg.raw_type(), TYPE_BITMAP_RESOURCE);
        assert_eq!(cfg.resource_id(), 0x012A);
        assert_eq!(cfg.splash_type().unwrap(), SplashType::BitmapResource(0x012A));
    }

    #[test]
    fn decodes_none_record() {
        let cfg = SplashConfiguration::from_record(&[0; 8]).unwrap();
        assert_eq!(cfg.splash_type().unwrap(), SplashType::None);
    }

    #[test]
    fn short_record_is_rejected() {
        let err = SplashConfiguration::from_record(&[1, 0, 0, 0, 5, 0]).unwrap_err();
        assert!(matches!(err, SplashError::ConfigurationSize { expected: 8, actual: 6 }));
    }

    #[test]
    fn long_record_is_rejected() {
        let err = SplashConfiguration::from_record(&[0; 12]).unwrap_err();
        assert!(matches!(err, SplashError::ConfigurationSize { expected: 8, actual: 12 }));
    }

    #[test]
    fn unknown_type_is_invalid() {
        let cfg = SplashConfiguration::new(3, 100);
        assert!(matches!(cfg.splash_type(), Err(SplashError::InvalidConfiguration(3))));
    }

    #[test]
    fn record_layout_matches_resource_format() {
        let cfg = SplashConfiguration::new(TYPE_BITMAP_RESOURCE, 300);
        assert_eq!(cfg.to_record(), [1, 0, 0, 0, 0x2C, 0x01, 0, 0]);
    }
}
