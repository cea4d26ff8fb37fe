use icokit::{IcoError, IconImage, IconSize, PayloadFormat, SourceImage};

//===========================================================================//

#[test]
fn round_trip_three_sizes() {
    let sizes = [16, 32, 48].map(IconSize::square);
    let ico = icokit::encode(&gradient(100, 100), &sizes).unwrap();
    let images = icokit::decode(&ico).unwrap();
    assert_eq!(images.len(), 3);
    for (image, &size) in images.iter().zip(sizes.iter()) {
        assert_eq!(image.size(), size);
        assert_eq!(image.format(), PayloadFormat::Png);
        assert_eq!(image.decode().unwrap().size(), size);
    }
}

#[test]
fn header_is_byte_exact() {
    let sizes = [24, 64].map(IconSize::square);
    let ico = icokit::encode(&gradient(30, 30), &sizes).unwrap();
    assert_eq!(&ico[0..2], &[0x00, 0x00]);
    assert_eq!(&ico[2..4], &[0x01, 0x00]);
    assert_eq!(&ico[4..6], &[0x02, 0x00]);
}

#[test]
fn directory_fields_are_fixed() {
    let sizes = [IconSize::square(16), IconSize::new(48, 32)];
    let ico = icokit::encode(&gradient(30, 30), &sizes).unwrap();
    for (index, size) in sizes.iter().enumerate() {
        let entry = &ico[6 + 16 * index..][..16];
        assert_eq!(entry[0] as u32, size.width);
        assert_eq!(entry[1] as u32, size.height);
        assert_eq!(entry[2], 0, "color count");
        assert_eq!(entry[3], 0, "reserved");
        assert_eq!(&entry[4..6], &[1, 0], "color planes");
        assert_eq!(&entry[6..8], &[32, 0], "bits per pixel");
    }
}

#[test]
fn size_256_is_stored_as_zero() {
    let sizes = [IconSize::square(256)];
    let ico = icokit::encode(&gradient(40, 40), &sizes).unwrap();
    assert_eq!(ico[6], 0x00);
    assert_eq!(ico[7], 0x00);
    let images = icokit::decode(&ico).unwrap();
    assert_eq!(images[0].size(), IconSize::square(256));
    assert_eq!(images[0].decode().unwrap().size(), IconSize::square(256));
}

#[test]
fn payloads_are_contiguous() {
    let sizes = [16, 24, 32, 48, 64].map(IconSize::square);
    let ico = icokit::encode(&gradient(50, 50), &sizes).unwrap();
    let mut expected_offset = 6 + 16 * sizes.len() as u32;
    for index in 0..sizes.len() {
        let entry = &ico[6 + 16 * index..][..16];
        let data_size = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]);
        let data_offset =
            u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]);
        assert_eq!(data_offset, expected_offset, "entry {}", index);
        expected_offset += data_size;
    }
    assert_eq!(expected_offset as usize, ico.len());
}

#[test]
fn duplicate_sizes_are_kept() {
    let sizes = [IconSize::square(32), IconSize::square(32)];
    let ico = icokit::encode(&gradient(64, 64), &sizes).unwrap();
    let images = icokit::decode(&ico).unwrap();
    assert_eq!(images.len(), 2);
    for image in images.iter() {
        assert_eq!(image.size(), IconSize::square(32));
        let decoded = IconImage::read_png(image.data()).unwrap();
        assert_eq!(decoded.size(), IconSize::square(32));
    }
    let first_offset = u32::from_le_bytes([ico[18], ico[19], ico[20], ico[21]]);
    let second_offset = u32::from_le_bytes([ico[34], ico[35], ico[36], ico[37]]);
    assert_ne!(first_offset, second_offset);
}

#[test]
fn single_size_file_length() {
    let source = gradient(100, 100);
    let ico = icokit::encode(&source, &[IconSize::square(16)]).unwrap();
    let png = source
        .render(IconSize::square(16), icokit::Resampling::default())
        .unwrap()
        .to_png()
        .unwrap();
    assert_eq!(ico.len(), 6 + 16 + png.len());
    assert_eq!(&ico[22..], png.as_slice());
    let images = icokit::decode(&ico).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].size(), IconSize::square(16));
    assert_eq!(images[0].format(), PayloadFormat::Png);
}

#[test]
fn non_square_sizes_stretch_the_source() {
    let sizes = [IconSize::new(40, 10)];
    let ico = icokit::encode(&gradient(20, 20), &sizes).unwrap();
    let image = icokit::decode(&ico).unwrap()[0].decode().unwrap();
    assert_eq!(image.size(), IconSize::new(40, 10));
}

#[test]
fn encode_from_encoded_bytes() {
    let png = IconImage::from_rgba_data(8, 8, vec![0x7f; 256])
        .unwrap()
        .to_png()
        .unwrap();
    let ico = icokit::encode_bytes(&png, &IconSize::STANDARD).unwrap();
    let sizes: Vec<IconSize> =
        icokit::decode(&ico).unwrap().iter().map(|image| image.size()).collect();
    assert_eq!(sizes, IconSize::STANDARD);
}

#[test]
fn invalid_inputs_are_rejected() {
    let source = gradient(8, 8);
    for sizes in [
        &[][..],
        &[IconSize::new(0, 16)][..],
        &[IconSize::square(16), IconSize::square(257)][..],
    ] {
        match icokit::encode(&source, sizes) {
            Err(IcoError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput for {:?}, got {:?}", sizes, other),
        }
    }
    assert!(matches!(
        icokit::encode_bytes(b"not an image", &IconSize::STANDARD),
        Err(IcoError::InvalidInput(_))
    ));
}

//===========================================================================//

fn gradient(width: u32, height: u32) -> SourceImage {
    let mut rgba = Vec::with_capacity((4 * width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.push((255 * x / width) as u8);
            rgba.push((255 * y / height) as u8);
            rgba.push(0x80);
            rgba.push(if (x + y) % 5 == 0 { 0x40 } else { 0xff });
        }
    }
    let image = IconImage::from_rgba_data(width, height, rgba).unwrap();
    SourceImage::try_from(image).unwrap()
}

//===========================================================================//
