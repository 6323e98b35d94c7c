//! Hand-built font binaries for tests
//!
//! A small TrueType font both ttf-parser and fontdue accept. Glyph 0
//! (.notdef) is empty; glyph 1 is a solid box from (50, 0) to (450, 700)
//! in a 1000-unit em, and every printable ASCII character except space
//! maps to it. Both glyphs advance 500 units.

fn be16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn be32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(54);
    be32(&mut t, 0x0001_0000); // version
    be32(&mut t, 0x0001_0000); // fontRevision
    be32(&mut t, 0); // checkSumAdjustment
    be32(&mut t, 0x5F0F_3CF5); // magicNumber
    be16(&mut t, 0); // flags
    be16(&mut t, 1000); // unitsPerEm
    t.extend_from_slice(&[0; 8]); // created
    t.extend_from_slice(&[0; 8]); // modified
    be16(&mut t, BOX_X0 as u16); // xMin
    be16(&mut t, 0); // yMin
    be16(&mut t, BOX_X1 as u16); // xMax
    be16(&mut t, BOX_TOP as u16); // yMax
    be16(&mut t, 0); // macStyle
    be16(&mut t, 8); // lowestRecPPEM
    be16(&mut t, 2); // fontDirectionHint
    be16(&mut t, 0); // indexToLocFormat
    be16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(36);
    be32(&mut t, 0x0001_0000); // version
    be16(&mut t, 800); // ascender
    be16(&mut t, (-200i16) as u16); // descender
    be16(&mut t, 0); // lineGap
    be16(&mut t, 500); // advanceWidthMax
    be16(&mut t, 0); // minLeftSideBearing
    be16(&mut t, 0); // minRightSideBearing
    be16(&mut t, 0); // xMaxExtent
    be16(&mut t, 1); // caretSlopeRise
    be16(&mut t, 0); // caretSlopeRun
    be16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0; 8]); // reserved
    be16(&mut t, 0); // metricDataFormat
    be16(&mut t, 2); // numberOfHMetrics
    t
}

fn hmtx_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(8);
    be16(&mut t, 500); // .notdef advance
    be16(&mut t, 0); // lsb
    be16(&mut t, 500); // box advance
    be16(&mut t, BOX_X0 as u16); // lsb
    t
}

fn maxp_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    be32(&mut t, 0x0000_5000); // version 0.5
    be16(&mut t, 2); // numGlyphs
    t
}

/// Format 4 subtable mapping U+0021..U+007E to glyph 1
fn cmap_table() -> Vec<u8> {
    const FIRST: u16 = 0x21;
    const LAST: u16 = 0x7E;
    let count = (LAST - FIRST + 1) as usize;

    let mut sub = Vec::new();
    be16(&mut sub, 4); // format
    be16(&mut sub, (16 + 4 * 2 * 2 + count * 2) as u16); // length
    be16(&mut sub, 0); // language
    be16(&mut sub, 4); // segCountX2
    be16(&mut sub, 4); // searchRange
    be16(&mut sub, 1); // entrySelector
    be16(&mut sub, 0); // rangeShift
    be16(&mut sub, LAST); // endCode
    be16(&mut sub, 0xFFFF);
    be16(&mut sub, 0); // reservedPad
    be16(&mut sub, FIRST); // startCode
    be16(&mut sub, 0xFFFF);
    be16(&mut sub, 0); // idDelta
    be16(&mut sub, 1);
    be16(&mut sub, 4); // idRangeOffset: glyphIdArray follows this array
    be16(&mut sub, 0);
    for _ in 0..count {
        be16(&mut sub, 1);
    }

    let mut t = Vec::new();
    be16(&mut t, 0); // version
    be16(&mut t, 1); // numTables
    be16(&mut t, 3); // platformID: Windows
    be16(&mut t, 1); // encodingID: Unicode BMP
    be32(&mut t, 12); // offset
    t.extend_from_slice(&sub);
    t
}

const BOX_X0: i16 = 50;
const BOX_X1: i16 = 450;
const BOX_TOP: i16 = 700;

/// Glyph 1: one closed contour, four on-curve points
fn glyf_table() -> Vec<u8> {
    let mut t = Vec::new();
    be16(&mut t, 1); // numberOfContours
    be16(&mut t, BOX_X0 as u16);
    be16(&mut t, 0);
    be16(&mut t, BOX_X1 as u16);
    be16(&mut t, BOX_TOP as u16);
    be16(&mut t, 3); // endPtsOfContours
    be16(&mut t, 0); // instructionLength
    t.extend_from_slice(&[0x01; 4]); // on-curve, 16-bit deltas
    for dx in [BOX_X0, 0, BOX_X1 - BOX_X0, 0] {
        be16(&mut t, dx as u16);
    }
    for dy in [0, BOX_TOP, 0, -BOX_TOP] {
        be16(&mut t, dy as u16);
    }
    t
}

/// Short offsets (halved): .notdef is empty, glyph 1 fills the table
fn loca_table(glyf_len: usize) -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    be16(&mut t, 0);
    be16(&mut t, 0);
    be16(&mut t, (glyf_len / 2) as u16);
    t
}

/// Tables of the minimal font, sorted by tag
pub fn minimal_tables() -> Vec<([u8; 4], Vec<u8>)> {
    let glyf = glyf_table();
    let loca = loca_table(glyf.len());
    vec![
        (*b"cmap", cmap_table()),
        (*b"glyf", glyf),
        (*b"head", head_table()),
        (*b"hhea", hhea_table()),
        (*b"hmtx", hmtx_table()),
        (*b"loca", loca),
        (*b"maxp", maxp_table()),
    ]
}

/// Assemble an sfnt from tag-sorted tables
pub fn build_sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut out = Vec::new();
    be32(&mut out, 0x0001_0000);
    be16(&mut out, num_tables);
    let entry_selector = 15 - num_tables.max(1).leading_zeros() as u16;
    let search_range = 16u16 << entry_selector;
    be16(&mut out, search_range);
    be16(&mut out, entry_selector);
    be16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        be32(&mut out, 0); // checksum (not verified by parsers)
        be32(&mut out, offset);
        be32(&mut out, data.len() as u32);
        offset += (data.len() as u32 + 3) & !3;
    }
    for (_, data) in tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

/// A decodable TrueType font with one box glyph
pub fn minimal_sfnt() -> Vec<u8> {
    build_sfnt(&minimal_tables())
}
