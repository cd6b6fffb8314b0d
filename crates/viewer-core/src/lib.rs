#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Continuous,
    SinglePage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomMode {
    FitWidth,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollResponse {
    Consumed,
    NotConsumed,
}

pub const PAGE_SPACING: f32 = 10.0;
pub const ZOOM_STEP: f32 = 1.25;
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 8.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub offsets: Vec<f32>,
    pub widths: Vec<f32>,
    pub heights: Vec<f32>,
    pub content_width: f32,
    pub content_height: f32,
}

impl PageLayout {
    pub fn page_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

pub fn fit_width_zoom(viewport_width: f32, page_width: f32) -> f32 {
    if viewport_width <= 0.0 || page_width <= 0.0 {
        return 1.0;
    }

    viewport_width / page_width
}

pub fn zoom_in(zoom: f32) -> f32 {
    step_zoom(zoom, ZOOM_STEP, MIN_ZOOM, MAX_ZOOM)
}

pub fn zoom_out(zoom: f32) -> f32 {
    step_zoom(zoom, 1.0 / ZOOM_STEP, MIN_ZOOM, MAX_ZOOM)
}

pub fn step_zoom(zoom: f32, factor: f32, min_zoom: f32, max_zoom: f32) -> f32 {
    let base = if zoom > 0.0 { zoom } else { 1.0 };
    (base * factor).clamp(min_zoom, max_zoom)
}

pub fn layout_pages(page_sizes_px: &[(f32, f32)], viewport_width: f32) -> PageLayout {
    let mut layout = PageLayout {
        offsets: Vec::with_capacity(page_sizes_px.len()),
        widths: Vec::with_capacity(page_sizes_px.len()),
        heights: Vec::with_capacity(page_sizes_px.len()),
        content_width: viewport_width.max(0.0),
        content_height: 0.0,
    };

    let mut cursor = 0.0;

    for (index, &(width, height)) in page_sizes_px.iter().enumerate() {
        if index > 0 {
            cursor += PAGE_SPACING;
        }

        layout.offsets.push(cursor);
        layout.widths.push(width);
        layout.heights.push(height);

        if width > layout.content_width {
            layout.content_width = width;
        }

        cursor += height;
    }

    if layout.offsets.is_empty() {
        layout.content_width = 0.0;
    } else {
        layout.content_height = cursor;
    }

    layout
}

pub fn scroll_target_fraction(
    page_index: usize,
    layout: &PageLayout,
    viewport_height: f32,
) -> Option<f32> {
    let offset = *layout.offsets.get(page_index)?;

    if layout.content_height <= 0.0 {
        return None;
    }

    let target_px = (offset - viewport_height / 2.0).max(0.0);

    Some((target_px / layout.content_height).clamp(0.0, 1.0))
}

pub fn clamp_page_index(index: usize, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }

    index.min(page_count - 1)
}

pub fn next_page(index: usize, page_count: usize) -> usize {
    if index + 1 < page_count {
        index + 1
    } else {
        index
    }
}

pub fn previous_page(index: usize) -> usize {
    index.saturating_sub(1)
}

pub fn apply_scroll(
    scroll_px: f32,
    delta: f32,
    viewport_height: f32,
    content_height: f32,
    over_content: bool,
) -> (f32, ScrollResponse) {
    if !over_content {
        return (scroll_px, ScrollResponse::NotConsumed);
    }

    let max_scroll = content_height - viewport_height;
    if max_scroll <= 0.0 {
        return (scroll_px, ScrollResponse::NotConsumed);
    }

    let next = (scroll_px + delta).clamp(0.0, max_scroll);

    if next == scroll_px {
        (scroll_px, ScrollResponse::NotConsumed)
    } else {
        (next, ScrollResponse::Consumed)
    }
}

pub fn page_at_offset(offset: f32, layout: &PageLayout) -> usize {
    let mut cursor = 0.0;

    for (index, height) in layout.heights.iter().enumerate() {
        let page_end = cursor + height;
        if offset <= page_end {
            return index;
        }

        cursor = page_end + PAGE_SPACING;
    }

    layout.page_count().saturating_sub(1)
}

pub fn current_page_from_scroll(
    scroll_px: f32,
    viewport_height: f32,
    layout: &PageLayout,
) -> usize {
    if layout.is_empty() {
        return 0;
    }

    let center = (scroll_px + viewport_height / 2.0).max(0.0);
    page_at_offset(center, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_layout(pages: usize, width: f32, height: f32) -> PageLayout {
        layout_pages(&vec![(width, height); pages], width)
    }

    #[test]
    fn fit_width_is_viewport_over_page_width() {
        assert_eq!(fit_width_zoom(800.0, 600.0), 800.0 / 600.0);
        assert_eq!(fit_width_zoom(1000.0, 500.0), 2.0);
    }

    #[test]
    fn fit_width_degenerate_page_falls_back_to_identity() {
        assert_eq!(fit_width_zoom(800.0, 0.0), 1.0);
        assert_eq!(fit_width_zoom(0.0, 600.0), 1.0);
    }

    #[test]
    fn zoom_steps_multiply_and_divide_by_fixed_factor() {
        assert_eq!(zoom_in(1.0), 1.25);
        assert!((zoom_out(1.25) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_never_leaves_clamp_range() {
        let mut zoom = 1.0;
        for _ in 0..64 {
            zoom = zoom_out(zoom);
        }
        assert_eq!(zoom, MIN_ZOOM);

        for _ in 0..64 {
            zoom = zoom_in(zoom);
        }
        assert_eq!(zoom, MAX_ZOOM);
    }

    #[test]
    fn step_zoom_honors_caller_supplied_bounds() {
        assert_eq!(step_zoom(1.0, 4.0, 0.5, 2.0), 2.0);
        assert_eq!(step_zoom(1.0, 0.1, 0.5, 2.0), 0.5);
        assert_eq!(step_zoom(0.0, 1.25, 0.5, 2.0), 1.25);
    }

    #[test]
    fn layout_stacks_pages_with_fixed_spacing() {
        let layout = layout_pages(&[(600.0, 800.0), (600.0, 800.0), (600.0, 400.0)], 500.0);

        assert_eq!(layout.offsets, vec![0.0, 810.0, 1620.0]);
        assert_eq!(layout.content_height, 2020.0);
        assert_eq!(layout.content_width, 600.0);
    }

    #[test]
    fn layout_content_width_covers_viewport() {
        let layout = layout_pages(&[(600.0, 800.0)], 1024.0);
        assert_eq!(layout.content_width, 1024.0);
    }

    #[test]
    fn layout_of_no_pages_has_zero_extent() {
        let layout = layout_pages(&[], 800.0);
        assert!(layout.is_empty());
        assert_eq!(layout.content_width, 0.0);
        assert_eq!(layout.content_height, 0.0);
    }

    #[test]
    fn scroll_target_centers_page_top_half_viewport_up() {
        let layout = uniform_layout(5, 600.0, 800.0);

        let fraction = scroll_target_fraction(2, &layout, 600.0).expect("in range");
        let expected = (1620.0 - 300.0) / layout.content_height;
        assert!((fraction - expected).abs() < 1e-6);

        // Page 0 would land above the top of the document.
        assert_eq!(scroll_target_fraction(0, &layout, 600.0), Some(0.0));
    }

    #[test]
    fn scroll_target_out_of_range_is_none() {
        let layout = uniform_layout(3, 600.0, 800.0);
        assert_eq!(scroll_target_fraction(3, &layout, 600.0), None);
        assert_eq!(scroll_target_fraction(0, &PageLayout::default(), 600.0), None);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        assert_eq!(next_page(4, 5), 4);
        assert_eq!(next_page(3, 5), 4);
        assert_eq!(previous_page(0), 0);
        assert_eq!(previous_page(2), 1);
        assert_eq!(clamp_page_index(9, 4), 3);
        assert_eq!(clamp_page_index(2, 0), 0);
    }

    #[test]
    fn scroll_off_content_surface_is_not_consumed() {
        let (next, response) = apply_scroll(100.0, 40.0, 600.0, 2000.0, false);
        assert_eq!(next, 100.0);
        assert_eq!(response, ScrollResponse::NotConsumed);
    }

    #[test]
    fn scroll_with_short_content_is_not_consumed() {
        let (next, response) = apply_scroll(0.0, 40.0, 600.0, 500.0, true);
        assert_eq!(next, 0.0);
        assert_eq!(response, ScrollResponse::NotConsumed);
    }

    #[test]
    fn scroll_is_consumed_exactly_when_position_changes() {
        let (next, response) = apply_scroll(0.0, 40.0, 600.0, 2000.0, true);
        assert_eq!(next, 40.0);
        assert_eq!(response, ScrollResponse::Consumed);

        // Already at the bottom extreme.
        let (next, response) = apply_scroll(1400.0, 40.0, 600.0, 2000.0, true);
        assert_eq!(next, 1400.0);
        assert_eq!(response, ScrollResponse::NotConsumed);

        // Already at the top.
        let (next, response) = apply_scroll(0.0, -40.0, 600.0, 2000.0, true);
        assert_eq!(next, 0.0);
        assert_eq!(response, ScrollResponse::NotConsumed);
    }

    #[test]
    fn page_at_offset_walks_spacing_gaps() {
        let layout = uniform_layout(3, 600.0, 800.0);

        assert_eq!(page_at_offset(0.0, &layout), 0);
        assert_eq!(page_at_offset(805.0, &layout), 1);
        assert_eq!(page_at_offset(10_000.0, &layout), 2);
    }

    #[test]
    fn current_page_tracks_viewport_center() {
        let layout = uniform_layout(3, 600.0, 800.0);

        assert_eq!(current_page_from_scroll(0.0, 600.0, &layout), 0);
        assert_eq!(current_page_from_scroll(700.0, 600.0, &layout), 1);
    }
}
