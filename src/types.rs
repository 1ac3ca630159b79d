//! Core type definitions shared across the encoder pipeline.

use crate::consts::DCTSIZE2;

/// One 8x8 block of samples or coefficients, natural (row-major) order.
pub type Block = [i16; DCTSIZE2];

// =============================================================================
// Sampling Factor / Subsampling
// =============================================================================

/// Chroma subsampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subsampling {
    /// 4:4:4 - No subsampling
    S444,
    /// 4:2:0 - Horizontal and vertical subsampling
    #[default]
    S420,
}

impl Subsampling {
    /// Returns (h_samp_factor, v_samp_factor) for the luminance component.
    pub const fn luma_factors(self) -> (u8, u8) {
        match self {
            Subsampling::S444 => (1, 1),
            Subsampling::S420 => (2, 2),
        }
    }

    /// Returns (h_samp_factor, v_samp_factor) for chroma components.
    pub const fn chroma_factors(self) -> (u8, u8) {
        (1, 1)
    }

    /// MCU edge length in pixels.
    pub const fn mcu_size(self) -> usize {
        match self {
            Subsampling::S444 => 8,
            Subsampling::S420 => 16,
        }
    }

    /// Number of luminance blocks per MCU.
    pub const fn luma_blocks_per_mcu(self) -> usize {
        let (h, v) = self.luma_factors();
        h as usize * v as usize
    }
}

impl From<bool> for Subsampling {
    /// `true` selects 4:2:0, `false` selects 4:4:4.
    fn from(subsample: bool) -> Self {
        if subsample {
            Subsampling::S420
        } else {
            Subsampling::S444
        }
    }
}

// =============================================================================
// Components
// =============================================================================

/// Color component of a YCbCr frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Luminance
    Y = 0,
    /// Blue-difference chroma
    Cb = 1,
    /// Red-difference chroma
    Cr = 2,
}

impl Component {
    /// All components in frame order.
    pub const ALL: [Component; 3] = [Component::Y, Component::Cb, Component::Cr];

    /// Index into per-component state arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for Cb and Cr.
    #[inline]
    pub const fn is_chroma(self) -> bool {
        !matches!(self, Component::Y)
    }
}

/// Frame component description as written to SOF0 and SOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Component identifier (1 = Y, 2 = Cb, 3 = Cr)
    pub component_id: u8,
    /// Horizontal sampling factor
    pub h_samp_factor: u8,
    /// Vertical sampling factor
    pub v_samp_factor: u8,
    /// Quantization table slot
    pub quant_tbl_no: u8,
    /// DC Huffman table slot
    pub dc_tbl_no: u8,
    /// AC Huffman table slot
    pub ac_tbl_no: u8,
}

/// Build the three YCbCr component descriptors for a subsampling mode.
pub fn create_ycbcr_components(subsampling: Subsampling) -> [ComponentInfo; 3] {
    let (luma_h, luma_v) = subsampling.luma_factors();
    let (chroma_h, chroma_v) = subsampling.chroma_factors();

    Component::ALL.map(|comp| {
        let (h, v, table) = if comp.is_chroma() {
            (chroma_h, chroma_v, 1)
        } else {
            (luma_h, luma_v, 0)
        };
        ComponentInfo {
            component_id: comp.index() as u8 + 1,
            h_samp_factor: h,
            v_samp_factor: v,
            quant_tbl_no: table,
            dc_tbl_no: table,
            ac_tbl_no: table,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsampling_factors() {
        assert_eq!(Subsampling::S444.luma_factors(), (1, 1));
        assert_eq!(Subsampling::S420.luma_factors(), (2, 2));
        assert_eq!(Subsampling::S420.chroma_factors(), (1, 1));
        assert_eq!(Subsampling::S444.mcu_size(), 8);
        assert_eq!(Subsampling::S420.mcu_size(), 16);
        assert_eq!(Subsampling::S420.luma_blocks_per_mcu(), 4);
    }

    #[test]
    fn test_default_is_420() {
        assert_eq!(Subsampling::default(), Subsampling::S420);
        assert_eq!(Subsampling::from(true), Subsampling::S420);
        assert_eq!(Subsampling::from(false), Subsampling::S444);
    }

    #[test]
    fn test_ycbcr_components() {
        let comps = create_ycbcr_components(Subsampling::S420);
        assert_eq!(comps[0].component_id, 1);
        assert_eq!((comps[0].h_samp_factor, comps[0].v_samp_factor), (2, 2));
        assert_eq!(comps[0].quant_tbl_no, 0);
        for comp in &comps[1..] {
            assert_eq!((comp.h_samp_factor, comp.v_samp_factor), (1, 1));
            assert_eq!(comp.quant_tbl_no, 1);
            assert_eq!(comp.dc_tbl_no, 1);
            assert_eq!(comp.ac_tbl_no, 1);
        }
        assert_eq!(comps[2].component_id, 3);

        let comps = create_ycbcr_components(Subsampling::S444);
        assert_eq!((comps[0].h_samp_factor, comps[0].v_samp_factor), (1, 1));
    }
}
