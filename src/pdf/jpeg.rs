/// Frame header fields needed to embed a JPEG as a PDF image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u16,
    pub height: u16,
    pub components: u8,
    pub bits_per_component: u8,
}

impl JpegInfo {
    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }
}

pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8])
}

/// Walks the marker segments up to the first SOFn and reads the frame header.
pub fn read_info(data: &[u8]) -> Option<JpegInfo> {
    if !is_jpeg(data) {
        return None;
    }

    let mut i = 2;
    loop {
        while *data.get(i)? != 0xFF {
            i += 1;
        }
        while *data.get(i)? == 0xFF {
            i += 1;
        }
        let marker = *data.get(i)?;
        i += 1;

        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD8 => continue,
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = u16::from_be_bytes([*data.get(i)?, *data.get(i + 1)?]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let header = data.get(i + 2..i + 8)?;
            let info = JpegInfo {
                bits_per_component: header[0],
                height: u16::from_be_bytes([header[1], header[2]]),
                width: u16::from_be_bytes([header[3], header[4]]),
                components: header[5],
            };
            return (info.width > 0 && info.height > 0).then_some(info);
        }

        if length < 2 {
            return None;
        }
        i += length;
    }
}

/// Smallest byte stream `read_info` accepts: SOI, APP0, SOF0, EOI.
#[cfg(test)]
pub(crate) fn synthetic(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]);
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    for id in 1..=3u8 {
        data.extend_from_slice(&[id, 0x11, 0x00]);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}
