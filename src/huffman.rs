//! Huffman table construction for JPEG encoding.
//!
//! Tables are given in the DHT form (code counts per length plus symbols in
//! code order) and expanded into per-symbol code/length lookups following
//! Figures C.1-C.3 of ITU-T T.81. A code length of 0 marks a
//! symbol the table cannot encode.

use crate::consts::{
    AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES, AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES,
    DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES, DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES,
};
use crate::error::{Error, Result, TableClass};

/// Maximum code length allowed by JPEG (16 bits)
pub const MAX_CODE_LENGTH: usize = 16;

/// Largest symbol a DC table may carry.
const MAX_DC_SYMBOL: u8 = 15;

/// A validated Huffman table with O(1) symbol lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTable {
    class: TableClass,
    /// Number of codes of each length 1..=16
    bits: [u8; MAX_CODE_LENGTH],
    /// Symbols in order of increasing code
    values: Vec<u8>,
    /// Slot range per length: codes of length `l` occupy
    /// `offsets[l - 1]..offsets[l]`
    offsets: [usize; MAX_CODE_LENGTH + 1],
    /// Canonical code for each slot, parallel to `values`
    codes: Vec<u32>,
    /// Huffman code for each symbol (indexed by symbol value)
    ehufco: [u32; 256],
    /// Code length for each symbol (0 means no code assigned)
    ehufsi: [u8; 256],
}

impl HuffmanTable {
    /// Build a table from DHT-style counts and symbols.
    ///
    /// Fails if the counts disagree with `values.len()`, if a length runs
    /// out of codes, if a symbol repeats, or if a DC table holds a symbol
    /// above 15.
    pub fn new(class: TableClass, bits: [u8; MAX_CODE_LENGTH], values: &[u8]) -> Result<Self> {
        validate(class, &bits, values)?;
        Ok(Self::build(class, bits, values))
    }

    /// Figures C.1 and C.2: walk lengths in order, assigning consecutive
    /// codes and shifting left at each new length. Input must already
    /// have passed [`validate`].
    fn build(class: TableClass, bits: [u8; MAX_CODE_LENGTH], values: &[u8]) -> Self {
        let mut ehufco = [0u32; 256];
        let mut ehufsi = [0u8; 256];
        let mut offsets = [0usize; MAX_CODE_LENGTH + 1];
        let mut codes = Vec::with_capacity(values.len());

        let mut code = 0u32;
        let mut p = 0usize;
        for (len_minus_one, &count) in bits.iter().enumerate() {
            let len = len_minus_one as u8 + 1;
            for &symbol in &values[p..p + count as usize] {
                ehufco[symbol as usize] = code;
                ehufsi[symbol as usize] = len;
                codes.push(code);
                code += 1;
            }
            p += count as usize;
            offsets[len as usize] = p;
            code <<= 1;
        }

        Self {
            class,
            bits,
            values: values.to_vec(),
            offsets,
            codes,
            ehufco,
            ehufsi,
        }
    }

    /// DC or AC.
    #[inline]
    pub fn class(&self) -> TableClass {
        self.class
    }

    /// Code counts per length 1..=16, as written to DHT.
    #[inline]
    pub fn bits(&self) -> &[u8; MAX_CODE_LENGTH] {
        &self.bits
    }

    /// Symbols in code order, as written to DHT.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Slot boundaries per code length (`offsets[0] == 0`).
    #[inline]
    pub fn offsets(&self) -> &[usize; MAX_CODE_LENGTH + 1] {
        &self.offsets
    }

    /// Canonical code of each slot, in the same order as [`values`](Self::values).
    #[inline]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Get the code and length for a symbol.
    ///
    /// Returns `(0, 0)` if the symbol has no code.
    #[inline]
    pub fn get_code(&self, symbol: u8) -> (u32, u8) {
        let idx = symbol as usize;
        (self.ehufco[idx], self.ehufsi[idx])
    }

    /// Get the code and length for a symbol, failing if it is absent.
    #[inline]
    pub fn code_for(&self, symbol: u8) -> Result<(u32, u8)> {
        match self.get_code(symbol) {
            (_, 0) => Err(Error::SymbolNotFound {
                class: self.class,
                symbol,
            }),
            found => Ok(found),
        }
    }

    /// Annex K.3 DC luminance table.
    pub fn std_dc_luma() -> Self {
        Self::standard(TableClass::Dc, DC_LUMINANCE_BITS, &DC_LUMINANCE_VALUES)
    }

    /// Annex K.3 DC chrominance table.
    pub fn std_dc_chroma() -> Self {
        Self::standard(TableClass::Dc, DC_CHROMINANCE_BITS, &DC_CHROMINANCE_VALUES)
    }

    /// Annex K.3 AC luminance table.
    pub fn std_ac_luma() -> Self {
        Self::standard(TableClass::Ac, AC_LUMINANCE_BITS, &AC_LUMINANCE_VALUES)
    }

    /// Annex K.3 AC chrominance table.
    pub fn std_ac_chroma() -> Self {
        Self::standard(TableClass::Ac, AC_CHROMINANCE_BITS, &AC_CHROMINANCE_VALUES)
    }

    fn standard(class: TableClass, bits: [u8; MAX_CODE_LENGTH], values: &[u8]) -> Self {
        debug_assert!(validate(class, &bits, values).is_ok());
        Self::build(class, bits, values)
    }
}

/// Check DHT-style counts and symbols without building codes.
fn validate(class: TableClass, bits: &[u8; MAX_CODE_LENGTH], values: &[u8]) -> Result<()> {
    let total: usize = bits.iter().map(|&n| n as usize).sum();
    if total != values.len() {
        return Err(Error::InvalidHuffmanTable(
            "code counts do not match symbol count",
        ));
    }
    if total == 0 {
        return Err(Error::InvalidHuffmanTable("table has no symbols"));
    }

    let mut seen = [false; 256];
    for &symbol in values {
        if class == TableClass::Dc && symbol > MAX_DC_SYMBOL {
            return Err(Error::InvalidHuffmanTable("DC symbol above 15"));
        }
        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(Error::InvalidHuffmanTable("duplicate symbol"));
        }
    }

    let mut code = 0u32;
    for (len_minus_one, &count) in bits.iter().enumerate() {
        code += count as u32;
        // All-ones codes are reserved, so the counter must stay below 2^len
        if code >= 1u32 << (len_minus_one + 1) {
            return Err(Error::InvalidHuffmanTable("code lengths overflow"));
        }
        code <<= 1;
    }
    Ok(())
}

/// The four tables a baseline YCbCr scan uses: DC and AC, each for luma
/// (slot 0) and chroma (slot 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTableSet {
    dc: [HuffmanTable; 2],
    ac: [HuffmanTable; 2],
}

impl HuffmanTableSet {
    /// Assemble a set from `[luma, chroma]` DC and AC tables.
    pub fn new(dc: [HuffmanTable; 2], ac: [HuffmanTable; 2]) -> Result<Self> {
        if dc.iter().any(|t| t.class() != TableClass::Dc) {
            return Err(Error::InvalidHuffmanTable("AC table in a DC slot"));
        }
        if ac.iter().any(|t| t.class() != TableClass::Ac) {
            return Err(Error::InvalidHuffmanTable("DC table in an AC slot"));
        }
        Ok(Self { dc, ac })
    }

    /// The Annex K.3 tables.
    pub fn standard() -> Self {
        Self {
            dc: [HuffmanTable::std_dc_luma(), HuffmanTable::std_dc_chroma()],
            ac: [HuffmanTable::std_ac_luma(), HuffmanTable::std_ac_chroma()],
        }
    }

    /// DC table in slot `id` (0 = luma, 1 = chroma).
    #[inline]
    pub fn dc(&self, id: usize) -> &HuffmanTable {
        &self.dc[id]
    }

    /// AC table in slot `id` (0 = luma, 1 = chroma).
    #[inline]
    pub fn ac(&self, id: usize) -> &HuffmanTable {
        &self.ac[id]
    }

    /// Tables in DHT emission order: (class, slot, table) for DC-0, DC-1,
    /// AC-0, AC-1.
    pub fn iter(&self) -> impl Iterator<Item = (TableClass, u8, &HuffmanTable)> {
        let dc = self
            .dc
            .iter()
            .enumerate()
            .map(|(id, t)| (TableClass::Dc, id as u8, t));
        let ac = self
            .ac
            .iter()
            .enumerate()
            .map(|(id, t)| (TableClass::Ac, id as u8, t));
        dc.chain(ac)
    }
}

impl Default for HuffmanTableSet {
    fn default() -> Self {
        Self::standard()
    }
}
