pub mod color_alpha;
