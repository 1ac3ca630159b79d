//! MCU geometry and block assembly.
//!
//! An MCU covers 8x8 pixels without subsampling and 16x16 pixels with 4:2:0.
//! Pixels are converted to YCbCr as each block is filled, so no
//! full-resolution planes are ever materialized. Samples outside the image
//! replicate the last valid row and column.

use crate::color::{rgb_to_ycbcr, to_sample};
use crate::consts::{DCTSIZE, DCTSIZE2};
use crate::raster::Raster;
use crate::types::{Block, Subsampling};

/// Maximum luma blocks in one MCU (4:2:0)
pub const MAX_LUMA_BLOCKS: usize = 4;

/// MCU grid for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuGeometry {
    /// MCU edge length in pixels (8 or 16)
    pub mcu_size: usize,
    /// MCUs per row
    pub mcu_cols: usize,
    /// MCU rows
    pub mcu_rows: usize,
}

impl McuGeometry {
    /// Compute the grid covering a `width` x `height` image.
    pub fn new(width: usize, height: usize, subsampling: Subsampling) -> Self {
        let mcu_size = subsampling.mcu_size();
        Self {
            mcu_size,
            mcu_cols: (width + mcu_size - 1) / mcu_size,
            mcu_rows: (height + mcu_size - 1) / mcu_size,
        }
    }

    /// Total MCU count.
    #[inline]
    pub fn mcu_count(&self) -> usize {
        self.mcu_cols * self.mcu_rows
    }

    /// `(mcu_row, mcu_col)` pairs in scan order: rows top to bottom,
    /// columns left to right.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.mcu_cols;
        (0..self.mcu_rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

/// Level-shifted sample blocks for one MCU, in natural order.
#[derive(Debug, Clone)]
pub struct Mcu {
    /// Luma blocks: top-left, top-right, bottom-left, bottom-right
    pub luma: [Block; MAX_LUMA_BLOCKS],
    /// Number of valid entries in `luma` (1 or 4)
    pub luma_count: usize,
    /// Blue-difference chroma block
    pub cb: Block,
    /// Red-difference chroma block
    pub cr: Block,
}

impl Default for Mcu {
    fn default() -> Self {
        Self {
            luma: [[0; DCTSIZE2]; MAX_LUMA_BLOCKS],
            luma_count: 0,
            cb: [0; DCTSIZE2],
            cr: [0; DCTSIZE2],
        }
    }
}

impl Mcu {
    /// The valid luma blocks, in encode order.
    #[inline]
    pub fn luma_blocks(&self) -> &[Block] {
        &self.luma[..self.luma_count]
    }
}

/// Fills MCUs from a raster with color conversion, subsampling and edge
/// replication.
#[derive(Debug, Clone, Copy)]
pub struct BlockPlanner<'a> {
    raster: Raster<'a>,
    subsampling: Subsampling,
    geometry: McuGeometry,
}

impl<'a> BlockPlanner<'a> {
    /// Plan blocks for `raster` in the given subsampling mode.
    pub fn new(raster: Raster<'a>, subsampling: Subsampling) -> Self {
        let geometry = McuGeometry::new(raster.width(), raster.height(), subsampling);
        Self {
            raster,
            subsampling,
            geometry,
        }
    }

    /// The MCU grid being walked.
    #[inline]
    pub fn geometry(&self) -> McuGeometry {
        self.geometry
    }

    /// Fill `mcu` with the blocks of MCU (`mcu_row`, `mcu_col`).
    pub fn fill_mcu(&self, mcu_row: usize, mcu_col: usize, mcu: &mut Mcu) {
        let x0 = mcu_col * self.geometry.mcu_size;
        let y0 = mcu_row * self.geometry.mcu_size;

        mcu.luma_count = self.subsampling.luma_blocks_per_mcu();
        match self.subsampling {
            Subsampling::S444 => {
                self.fill_full(x0, y0, &mut mcu.luma[0], &mut mcu.cb, &mut mcu.cr);
            }
            Subsampling::S420 => {
                for (i, block) in mcu.luma[..mcu.luma_count].iter_mut().enumerate() {
                    let bx = x0 + (i % 2) * DCTSIZE;
                    let by = y0 + (i / 2) * DCTSIZE;
                    self.fill_luma(bx, by, block);
                }
                self.fill_chroma_420(x0, y0, &mut mcu.cb, &mut mcu.cr);
            }
        }
    }

    /// One 8x8 region at full resolution for all three components.
    fn fill_full(&self, x0: usize, y0: usize, y: &mut Block, cb: &mut Block, cr: &mut Block) {
        for row in 0..DCTSIZE {
            for col in 0..DCTSIZE {
                let (r, g, b) = self.raster.pixel_clamped(x0 + col, y0 + row);
                let (py, pcb, pcr) = rgb_to_ycbcr(r, g, b);
                let i = row * DCTSIZE + col;
                y[i] = to_sample(py);
                cb[i] = to_sample(pcb);
                cr[i] = to_sample(pcr);
            }
        }
    }

    fn fill_luma(&self, x0: usize, y0: usize, block: &mut Block) {
        for row in 0..DCTSIZE {
            for col in 0..DCTSIZE {
                let (r, g, b) = self.raster.pixel_clamped(x0 + col, y0 + row);
                let (py, _, _) = rgb_to_ycbcr(r, g, b);
                block[row * DCTSIZE + col] = to_sample(py);
            }
        }
    }

    /// Chroma for a 16x16 region, each sample the mean of a 2x2 group.
    fn fill_chroma_420(&self, x0: usize, y0: usize, cb: &mut Block, cr: &mut Block) {
        for row in 0..DCTSIZE {
            for col in 0..DCTSIZE {
                let (mut sum_cb, mut sum_cr) = (0.0f32, 0.0f32);
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let (r, g, b) = self
                        .raster
                        .pixel_clamped(x0 + col * 2 + dx, y0 + row * 2 + dy);
                    let (_, pcb, pcr) = rgb_to_ycbcr(r, g, b);
                    sum_cb += pcb;
                    sum_cr += pcr;
                }
                let i = row * DCTSIZE + col;
                cb[i] = to_sample(sum_cb / 4.0);
                cr[i] = to_sample(sum_cr / 4.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        rgb.repeat((width * height) as usize)
    }

    #[test]
    fn test_geometry() {
        let g = McuGeometry::new(16, 17, Subsampling::S420);
        assert_eq!((g.mcu_cols, g.mcu_rows), (1, 2));
        let g = McuGeometry::new(16, 17, Subsampling::S444);
        assert_eq!((g.mcu_cols, g.mcu_rows), (2, 3));
        let g = McuGeometry::new(1, 1, Subsampling::S420);
        assert_eq!(g.mcu_count(), 1);
        let g = McuGeometry::new(33, 8, Subsampling::S444);
        assert_eq!((g.mcu_cols, g.mcu_rows), (5, 1));
    }

    #[test]
    fn test_positions_scan_order() {
        let g = McuGeometry::new(20, 20, Subsampling::S444);
        let positions: Vec<_> = g.positions().collect();
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], (0, 0));
        assert_eq!(positions[1], (0, 1));
        assert_eq!(positions[3], (1, 0));
        assert_eq!(positions[8], (2, 2));
    }

    #[test]
    fn test_luma_count_follows_subsampling() {
        let data = solid(16, 16, [10, 20, 30]);
        let raster = Raster::new(&data, 16, 16).unwrap();
        let mut mcu = Mcu::default();
        for mode in [Subsampling::S444, Subsampling::S420] {
            BlockPlanner::new(raster, mode).fill_mcu(0, 0, &mut mcu);
            assert_eq!(mcu.luma_blocks().len(), mode.luma_blocks_per_mcu());
        }
    }

    #[test]
    fn test_solid_444() {
        let data = solid(8, 8, [255, 255, 255]);
        let raster = Raster::new(&data, 8, 8).unwrap();
        let planner = BlockPlanner::new(raster, Subsampling::S444);
        let mut mcu = Mcu::default();
        planner.fill_mcu(0, 0, &mut mcu);

        assert_eq!(mcu.luma_blocks().len(), 1);
        assert!(mcu.luma[0].iter().all(|&v| v == 127));
        assert!(mcu.cb.iter().all(|&v| v == 0));
        assert!(mcu.cr.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_420_block_layout() {
        // Left half black, right half white
        let mut data = Vec::new();
        for _ in 0..16 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let raster = Raster::new(&data, 16, 16).unwrap();
        let planner = BlockPlanner::new(raster, Subsampling::S420);
        let mut mcu = Mcu::default();
        planner.fill_mcu(0, 0, &mut mcu);

        assert_eq!(mcu.luma_blocks().len(), 4);
        assert!(mcu.luma[0].iter().all(|&v| v == -128));
        assert!(mcu.luma[1].iter().all(|&v| v == 127));
        assert!(mcu.luma[2].iter().all(|&v| v == -128));
        assert!(mcu.luma[3].iter().all(|&v| v == 127));
    }

    #[test]
    fn test_420_chroma_average() {
        // 2x2 group of pure red and pure blue pixels in a checkerboard
        let mut data = Vec::new();
        for y in 0..16 {
            for x in 0..16 {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        let raster = Raster::new(&data, 16, 16).unwrap();
        let planner = BlockPlanner::new(raster, Subsampling::S420);
        let mut mcu = Mcu::default();
        planner.fill_mcu(0, 0, &mut mcu);

        let (_, red_cb, red_cr) = rgb_to_ycbcr(255, 0, 0);
        let (_, blue_cb, blue_cr) = rgb_to_ycbcr(0, 0, 255);
        let expected_cb = to_sample((red_cb + blue_cb) / 2.0);
        let expected_cr = to_sample((red_cr + blue_cr) / 2.0);
        assert!(mcu.cb.iter().all(|&v| v == expected_cb));
        assert!(mcu.cr.iter().all(|&v| v == expected_cr));
    }

    #[test]
    fn test_16x17_replicates_last_row() {
        // Rows 0..16 black, row 16 white; 4:2:0 gives a second MCU row whose
        // every sample row repeats image row 16
        let mut data = solid(16, 16, [0, 0, 0]);
        data.extend(solid(16, 1, [255, 255, 255]));
        let raster = Raster::new(&data, 16, 17).unwrap();
        let planner = BlockPlanner::new(raster, Subsampling::S420);
        assert_eq!(planner.geometry().mcu_rows, 2);

        let mut mcu = Mcu::default();
        planner.fill_mcu(0, 0, &mut mcu);
        assert!(mcu.luma_blocks().iter().flatten().all(|&v| v == -128));

        planner.fill_mcu(1, 0, &mut mcu);
        for block in mcu.luma_blocks() {
            assert!(block.iter().all(|&v| v == 127));
        }
        assert!(mcu.cb.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_right_edge_replication() {
        // 9 pixels wide: column 8 is white, so the second 4:4:4 MCU is all white
        let mut data = Vec::new();
        for _ in 0..8 {
            for x in 0..9 {
                let v = if x == 8 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let raster = Raster::new(&data, 9, 8).unwrap();
        let planner = BlockPlanner::new(raster, Subsampling::S444);
        assert_eq!(planner.geometry().mcu_cols, 2);

        let mut mcu = Mcu::default();
        planner.fill_mcu(0, 1, &mut mcu);
        assert!(mcu.luma[0].iter().all(|&v| v == 127));
    }
}
