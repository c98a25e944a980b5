//! In-memory document builder for tests.

use crate::pipeline::layers::RecordKind;

/// One layer record to embed in a built document.
#[derive(Debug, Clone)]
pub(crate) struct LayerSpec {
    name: String,
    kind: RecordKind,
    hidden: bool,
    bounds: [i32; 4],
}

impl LayerSpec {
    fn new(name: &str, kind: RecordKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            hidden: false,
            bounds: [0, 0, 0, 0],
        }
    }

    pub fn pixel(name: &str) -> Self {
        Self::new(name, RecordKind::Pixel)
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, RecordKind::Text)
    }

    pub fn group_start(name: &str) -> Self {
        Self::new(name, RecordKind::GroupStart)
    }

    pub fn group_end() -> Self {
        Self::new("</Layer group>", RecordKind::GroupEnd)
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn bounds(mut self, top: i32, left: i32, bottom: i32, right: i32) -> Self {
        self.bounds = [top, left, bottom, right];
        self
    }

    /// Encode as a layer record with no channel data.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for v in self.bounds {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(b"8BIMnorm");
        out.push(255);
        out.push(0);
        out.push(if self.hidden { 0x02 } else { 0x00 });
        out.push(0);

        let mut extra = Vec::new();
        extra.extend_from_slice(&0u32.to_be_bytes());
        extra.extend_from_slice(&0u32.to_be_bytes());
        let name = self.name.as_bytes();
        let name_start = extra.len();
        extra.push(name.len() as u8);
        extra.extend_from_slice(name);
        while (extra.len() - name_start) % 4 != 0 {
            extra.push(0);
        }
        let block = |key: &[u8; 4], data: &[u8]| {
            let mut b = Vec::new();
            b.extend_from_slice(b"8BIM");
            b.extend_from_slice(key);
            b.extend_from_slice(&(data.len() as u32).to_be_bytes());
            b.extend_from_slice(data);
            b
        };
        match self.kind {
            RecordKind::Pixel => {}
            RecordKind::Text => extra.extend(block(b"TySh", &[0, 1, 0, 0])),
            RecordKind::GroupStart => extra.extend(block(b"lsct", &1u32.to_be_bytes())),
            RecordKind::GroupEnd => extra.extend(block(b"lsct", &3u32.to_be_bytes())),
        }

        out.extend_from_slice(&(extra.len() as u32).to_be_bytes());
        out.extend_from_slice(&extra);
        out
    }
}

/// Builds a complete version 1 document.
#[derive(Debug, Clone)]
pub(crate) struct PsdBuilder {
    width: u32,
    height: u32,
    depth: u16,
    mode: u16,
    planes: Vec<Vec<u8>>,
    palette: Vec<u8>,
    rle: bool,
    layers: Vec<LayerSpec>,
}

impl PsdBuilder {
    fn filled(width: u32, height: u32, mode: u16, values: &[u8]) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            depth: 8,
            mode,
            planes: values.iter().map(|&v| vec![v; len]).collect(),
            palette: Vec::new(),
            rle: false,
            layers: Vec::new(),
        }
    }

    pub fn grayscale(width: u32, height: u32, value: u8) -> Self {
        Self::filled(width, height, 1, &[value])
    }

    pub fn rgb(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::filled(width, height, 3, &rgb)
    }

    pub fn cmyk(width: u32, height: u32, cmyk: [u8; 4]) -> Self {
        Self::filled(width, height, 4, &cmyk)
    }

    /// Mode 9, filled with one L*a*b* value.
    pub fn lab(width: u32, height: u32, lab: [u8; 3]) -> Self {
        Self::filled(width, height, 9, &lab)
    }

    pub fn indexed(width: u32, height: u32, index: u8, rgb: [u8; 3]) -> Self {
        let mut builder = Self::filled(width, height, 2, &[index]);
        let mut palette = vec![0u8; 768];
        palette[index as usize] = rgb[0];
        palette[256 + index as usize] = rgb[1];
        palette[512 + index as usize] = rgb[2];
        builder.palette = palette;
        builder
    }

    /// One-bit document, every pixel black or white.
    pub fn bitmap(width: u32, height: u32, black: bool) -> Self {
        let row_bytes = width.div_ceil(8) as usize;
        let fill = if black { 0xFF } else { 0x00 };
        Self {
            width,
            height,
            depth: 1,
            mode: 0,
            planes: vec![vec![fill; row_bytes * height as usize]],
            palette: Vec::new(),
            rle: false,
            layers: Vec::new(),
        }
    }

    /// Add a constant alpha plane.
    pub fn alpha(mut self, value: u8) -> Self {
        self.planes.push(vec![value; (self.width * self.height) as usize]);
        self
    }

    /// Set a single pixel's value in every color plane.
    pub fn pixel(mut self, x: u32, y: u32, values: &[u8]) -> Self {
        let i = (y * self.width + x) as usize;
        for (plane, &v) in self.planes.iter_mut().zip(values) {
            plane[i] = v;
        }
        self
    }

    /// Re-encode every plane at 16 bits with a constant sample.
    pub fn depth16(mut self, value: u16) -> Self {
        let len = (self.width * self.height) as usize;
        self.depth = 16;
        for plane in &mut self.planes {
            *plane = value.to_be_bytes().repeat(len);
        }
        self
    }

    pub fn rle(mut self) -> Self {
        self.rle = true;
        self
    }

    pub fn layer(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"8BPS");
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&[0; 6]);
        out.extend_from_slice(&(self.planes.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.depth.to_be_bytes());
        out.extend_from_slice(&self.mode.to_be_bytes());

        out.extend_from_slice(&(self.palette.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.palette);

        // image resources
        out.extend_from_slice(&0u32.to_be_bytes());

        out.extend(self.layer_section());
        out.extend(self.image_data());
        out
    }

    fn layer_section(&self) -> Vec<u8> {
        if self.layers.is_empty() {
            return 0u32.to_be_bytes().to_vec();
        }
        let mut info = Vec::new();
        info.extend_from_slice(&(self.layers.len() as i16).to_be_bytes());
        for layer in &self.layers {
            info.extend(layer.encode());
        }
        if info.len() % 2 == 1 {
            info.push(0);
        }

        let mut body = Vec::new();
        body.extend_from_slice(&(info.len() as u32).to_be_bytes());
        body.extend(info);
        // global layer mask info
        body.extend_from_slice(&0u32.to_be_bytes());

        let mut out = Vec::new();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend(body);
        out
    }

    fn row_bytes(&self) -> usize {
        (self.width as usize * self.depth as usize).div_ceil(8)
    }

    fn image_data(&self) -> Vec<u8> {
        let row_bytes = self.row_bytes();
        let mut out = Vec::new();
        if !self.rle {
            out.extend_from_slice(&0u16.to_be_bytes());
            for plane in &self.planes {
                out.extend_from_slice(plane);
            }
            return out;
        }

        out.extend_from_slice(&1u16.to_be_bytes());
        let packed: Vec<Vec<u8>> = self
            .planes
            .iter()
            .flat_map(|plane| plane.chunks(row_bytes).map(pack_bits))
            .collect();
        for row in &packed {
            out.extend_from_slice(&(row.len() as u16).to_be_bytes());
        }
        for row in &packed {
            out.extend_from_slice(row);
        }
        out
    }
}

/// Encode runs of equal bytes as repeats and everything else as literals.
fn pack_bits(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < row.len() {
        let mut run = 1;
        while i + run < row.len() && row[i + run] == row[i] && run < 128 {
            run += 1;
        }
        if run >= 2 {
            out.push((1 - run as i16) as i8 as u8);
            out.push(row[i]);
            i += run;
        } else {
            let start = i;
            while i < row.len()
                && i - start < 128
                && (i + 1 >= row.len() || row[i + 1] != row[i])
            {
                i += 1;
            }
            if i == start {
                i += 1;
            }
            out.push((i - start - 1) as u8);
            out.extend_from_slice(&row[start..i]);
        }
    }
    out
}
