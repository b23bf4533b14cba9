use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RomError {
    #[error("invalid ROM image (size {len} < 32768 bytes)")]
    TooShort { len: usize },
    #[error("unknown memory bank controller type ({code:02X}h)")]
    UnknownMbc { code: u8 },
    #[error("invalid ROM bank count code ({code:02X}h)")]
    InvalidBankCount { code: u8 },
    #[error("error reading ROM from {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
}

const HEADER_LOGO: u16 = 0x0104;
const HEADER_TITLE: u16 = 0x0134;
const HEADER_MBC_TYPE: u16 = 0x0147;
const HEADER_ROM_BANKS: u16 = 0x0148;
const HEADER_RAM_SIZE: u16 = 0x0149;
const HEADER_CHECKSUM: u16 = 0x014D;
const GLOBAL_CHECKSUM: u16 = 0x014E;

const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

/// An immutable cartridge ROM image plus accessors for the header fields the
/// emulator cares about. Bank selection state lives on the bus, not here.
#[derive(Debug)]
pub struct RomImage(Vec<u8>);

impl RomImage {
    /// Validate and wrap raw ROM bytes.
    ///
    /// # `RomError`
    ///
    /// Fails if the image is smaller than 32 KiB or if the header names an
    /// MBC type or ROM bank count this emulator does not know.
    pub fn new(data: Vec<u8>) -> Result<Self, RomError> {
        if data.len() < 0x8000 {
            return Err(RomError::TooShort { len: data.len() });
        }

        let rom = Self(data);

        // Force header decoding errors to surface at load time
        rom.mbc_kind()?;
        rom.banks()?;

        log::info!("Loaded ROM image '{}'", rom.title());
        log::info!("Logo match: {}", rom.check_logo());
        log::info!("Header checksum: {}", rom.verify_header_checksum());
        log::info!("Global checksum: {}", rom.verify_global_checksum());
        log::info!("ERAM: {} bytes", rom.ram_size());
        log::info!("MBC: {:?}", rom.mbc_kind()?);

        Ok(rom)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let data = fs::read(path.as_ref()).map_err(|source| RomError::FileRead {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::new(data)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn check_logo(&self) -> bool {
        self.0[HEADER_LOGO as usize..HEADER_LOGO as usize + 48] == NINTENDO_LOGO
    }

    /// Cartridge title from the header, truncated at the first NUL.
    pub fn title(&self) -> String {
        let raw = &self.0[HEADER_TITLE as usize..HEADER_TITLE as usize + 16];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        raw[..end].iter().map(|&b| b as char).collect()
    }

    pub fn mbc_kind(&self) -> Result<MbcKind, RomError> {
        match self.0[HEADER_MBC_TYPE as usize] {
            0x00 | 0x08 | 0x09 => Ok(MbcKind::None),
            0x01 | 0x02 | 0x03 => Ok(MbcKind::Mbc1),
            0x05 | 0x06 => Ok(MbcKind::Mbc2),
            0x10..=0x13 => Ok(MbcKind::Mbc3),
            code => Err(RomError::UnknownMbc { code }),
        }
    }

    pub fn has_battery(&self) -> bool {
        matches!(
            self.0[HEADER_MBC_TYPE as usize],
            0x03 | 0x06 | 0x09 | 0x0F | 0x10 | 0x13
        )
    }

    /// Number of 16 KiB ROM banks claimed by the header.
    pub fn banks(&self) -> Result<usize, RomError> {
        match self.0[HEADER_ROM_BANKS as usize] {
            0x00 => Ok(2),
            0x01 => Ok(4),
            0x02 => Ok(8),
            0x03 => Ok(16),
            0x04 => Ok(32),
            0x05 => Ok(64),
            0x06 => Ok(128),
            0x08 => Ok(256),
            0x52 => Ok(72),
            0x53 => Ok(80),
            0x54 => Ok(96),
            code => Err(RomError::InvalidBankCount { code }),
        }
    }

    /// External RAM size in bytes from the header.
    pub fn ram_size(&self) -> usize {
        match self.0[HEADER_RAM_SIZE as usize] & 3 {
            1 => 2048,
            2 => 8192,
            3 => 32768,
            _ => 0,
        }
    }

    /// Header checksum over 0x0134..=0x014C: `x = x - byte - 1` from zero.
    pub fn header_checksum(&self) -> u8 {
        self.0[HEADER_TITLE as usize..HEADER_CHECKSUM as usize]
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
    }

    pub fn verify_header_checksum(&self) -> bool {
        self.header_checksum() == self.0[HEADER_CHECKSUM as usize]
    }

    /// Sum of every ROM byte except the two checksum bytes themselves.
    pub fn global_checksum(&self) -> u16 {
        self.0
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != GLOBAL_CHECKSUM as usize && i != GLOBAL_CHECKSUM as usize + 1)
            .fold(0u16, |x, (_, &b)| x.wrapping_add(u16::from(b)))
    }

    pub fn verify_global_checksum(&self) -> bool {
        let x = self.global_checksum();
        (x >> 8) as u8 == self.0[GLOBAL_CHECKSUM as usize]
            && x as u8 == self.0[GLOBAL_CHECKSUM as usize + 1]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A minimal 32 KiB image with the given MBC/RAM codes and valid
    /// checksums.
    pub(crate) fn build_rom(mbc_code: u8, ram_code: u8) -> Vec<u8> {
        let mut data = vec![0u8; 0x8000];
        data[HEADER_LOGO as usize..HEADER_LOGO as usize + 48].copy_from_slice(&NINTENDO_LOGO);
        data[HEADER_TITLE as usize..HEADER_TITLE as usize + 4].copy_from_slice(b"TEST");
        data[HEADER_MBC_TYPE as usize] = mbc_code;
        data[HEADER_ROM_BANKS as usize] = 0x00;
        data[HEADER_RAM_SIZE as usize] = ram_code;

        let header_checksum = data[0x0134..0x014D]
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));
        data[HEADER_CHECKSUM as usize] = header_checksum;

        let global = data
            .iter()
            .fold(0u16, |x, &b| x.wrapping_add(u16::from(b)));
        data[GLOBAL_CHECKSUM as usize] = (global >> 8) as u8;
        data[GLOBAL_CHECKSUM as usize + 1] = global as u8;

        data
    }

    #[test]
    fn rejects_short_image() {
        let err = RomImage::new(vec![0; 0x4000]).unwrap_err();
        assert!(matches!(err, RomError::TooShort { len: 0x4000 }));
    }

    #[test]
    fn rejects_unknown_mbc() {
        let err = RomImage::new(build_rom(0x42, 0x00)).unwrap_err();
        assert!(matches!(err, RomError::UnknownMbc { code: 0x42 }));
    }

    #[test]
    fn header_fields() {
        let rom = RomImage::new(build_rom(0x03, 0x02)).unwrap();
        assert_eq!("TEST", rom.title());
        assert_eq!(MbcKind::Mbc1, rom.mbc_kind().unwrap());
        assert!(rom.has_battery());
        assert_eq!(2, rom.banks().unwrap());
        assert_eq!(8192, rom.ram_size());
        assert!(rom.check_logo());
    }

    #[test]
    fn mbc_codes() {
        for (code, kind) in [
            (0x00, MbcKind::None),
            (0x08, MbcKind::None),
            (0x09, MbcKind::None),
            (0x01, MbcKind::Mbc1),
            (0x02, MbcKind::Mbc1),
            (0x03, MbcKind::Mbc1),
            (0x05, MbcKind::Mbc2),
            (0x06, MbcKind::Mbc2),
            (0x10, MbcKind::Mbc3),
            (0x11, MbcKind::Mbc3),
            (0x12, MbcKind::Mbc3),
            (0x13, MbcKind::Mbc3),
        ] {
            let rom = RomImage::new(build_rom(code, 0x00)).unwrap();
            assert_eq!(kind, rom.mbc_kind().unwrap(), "code {code:02X}");
        }
    }

    #[test]
    fn battery_codes() {
        for code in [0x03, 0x06, 0x09, 0x10, 0x13] {
            assert!(RomImage::new(build_rom(code, 0)).unwrap().has_battery());
        }
        for code in [0x00, 0x01, 0x02, 0x05, 0x11, 0x12] {
            assert!(!RomImage::new(build_rom(code, 0)).unwrap().has_battery());
        }
    }

    #[test]
    fn checksums_verify() {
        let rom = RomImage::new(build_rom(0x00, 0x00)).unwrap();
        assert!(rom.verify_header_checksum());
        assert!(rom.verify_global_checksum());

        let mut corrupted = build_rom(0x00, 0x00);
        corrupted[0x0134] ^= 0xFF;
        let rom = RomImage::new(corrupted).unwrap();
        assert!(!rom.verify_header_checksum());
        assert!(!rom.verify_global_checksum());
    }
}
