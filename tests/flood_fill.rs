use raster_paint::canvas::{Color, PixelBuffer, Point, flood_fill};

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

/// A white buffer split by a vertical black wall at `wall_x`, with a single gap at `gap_y`
fn walled_buffer(width: u32, height: u32, wall_x: i32, gap_y: Option<i32>) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height, Color::WHITE);
    for y in 0..height as i32 {
        if Some(y) != gap_y {
            buffer.set_opaque(Point::new(wall_x, y), Color::BLACK);
        }
    }
    buffer
}

fn count(buffer: &PixelBuffer, color: Color) -> usize {
    let mut n = 0;
    for y in 0..buffer.height() as i32 {
        for x in 0..buffer.width() as i32 {
            if buffer.rgb_at(Point::new(x, y)) == Some(color) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_fill_whole_buffer_then_repeat_is_noop() {
    let mut buffer = PixelBuffer::new(4, 4, Color::WHITE);

    let report = flood_fill(&mut buffer, Point::new(0, 0), Color::BLACK);
    assert_eq!(report.pixels_filled, 16);
    assert_eq!(count(&buffer, Color::BLACK), 16);

    let before = buffer.clone();
    let report = flood_fill(&mut buffer, Point::new(0, 0), Color::BLACK);
    assert!(report.is_noop());
    assert_eq!(buffer, before);
}

#[test]
fn test_unmatched_pixel_is_untouched() {
    let mut buffer = PixelBuffer::new(4, 4, Color::BLACK);
    buffer.set_opaque(Point::new(2, 2), RED);

    let report = flood_fill(&mut buffer, Point::new(0, 0), BLUE);

    assert_eq!(report.pixels_filled, 15);
    assert_eq!(buffer.rgb_at(Point::new(2, 2)), Some(RED));
    assert_eq!(count(&buffer, BLUE), 15);
}

#[test]
fn test_wall_stops_fill() {
    let mut buffer = walled_buffer(8, 5, 3, None);

    let report = flood_fill(&mut buffer, Point::new(0, 0), RED);

    // Columns 0..3 only
    assert_eq!(report.pixels_filled, 15);
    for y in 0..5 {
        assert_eq!(buffer.rgb_at(Point::new(2, y)), Some(RED));
        assert_eq!(buffer.rgb_at(Point::new(3, y)), Some(Color::BLACK));
        assert_eq!(buffer.rgb_at(Point::new(4, y)), Some(Color::WHITE));
    }
}

#[test]
fn test_fill_passes_through_gap() {
    let mut buffer = walled_buffer(8, 5, 3, Some(4));

    let report = flood_fill(&mut buffer, Point::new(0, 0), RED);

    // Everything except the four wall pixels
    assert_eq!(report.pixels_filled, 8 * 5 - 4);
    assert_eq!(count(&buffer, Color::BLACK), 4);
    assert_eq!(count(&buffer, Color::WHITE), 0);
}

#[test]
fn test_diagonal_neighbors_are_not_connected() {
    // Checkerboard: no two white pixels share an edge
    let mut buffer = PixelBuffer::new(4, 4, Color::WHITE);
    for y in 0..4 {
        for x in 0..4 {
            if (x + y) % 2 == 1 {
                buffer.set_opaque(Point::new(x, y), Color::BLACK);
            }
        }
    }

    let report = flood_fill(&mut buffer, Point::new(1, 1), RED);

    assert_eq!(report.pixels_filled, 1);
    assert_eq!(buffer.rgb_at(Point::new(0, 0)), Some(Color::WHITE));
    assert_eq!(buffer.rgb_at(Point::new(2, 2)), Some(Color::WHITE));
}

#[test]
fn test_out_of_bounds_seed_is_noop() {
    let mut buffer = PixelBuffer::new(4, 4, Color::WHITE);
    let before = buffer.clone();

    for seed in [Point::new(-1, 0), Point::new(0, -1), Point::new(4, 0), Point::new(0, 4)] {
        assert!(flood_fill(&mut buffer, seed, RED).is_noop());
    }
    assert_eq!(buffer, before);
}

#[test]
fn test_filled_pixels_become_opaque() {
    // Transparent pixels are black in RGB terms
    let mut buffer = PixelBuffer::transparent(3, 3);

    flood_fill(&mut buffer, Point::new(1, 1), RED);

    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(buffer.rgba_at(Point::new(x, y)), Some([255, 0, 0, 255]));
        }
    }
}

#[test]
fn test_large_region_does_not_overflow() {
    let mut buffer = PixelBuffer::new(512, 512, Color::WHITE);

    let report = flood_fill(&mut buffer, Point::new(256, 256), BLUE);

    assert_eq!(report.pixels_filled, 512 * 512);
}
