use std::path::Path;

use console::Style;
use focalsynth_core::config::{FilterConfig, FocalStackConfig};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_stack_summary(config: &FocalStackConfig, input: &Path, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Focal Stack"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(11)));
    println!();
    println!("  {:<12}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    println!("  {:<12}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!("  {:<12}{}", s.label.apply_to("Layers"), s.value.apply_to(config.layers));
    println!("  {:<12}{}", s.label.apply_to("Sigma"), s.value.apply_to(config.sigma));
    println!("  {:<12}{}", s.label.apply_to("PSF"), s.method.apply_to(config.psf));
    if config.normalize {
        println!(
            "  {:<12}{}",
            s.label.apply_to("Normalize"),
            s.method.apply_to(format!("1/{}", config.layers))
        );
    } else {
        println!("  {:<12}{}", s.label.apply_to("Normalize"), s.disabled.apply_to("off"));
    }
    println!();
}

pub fn print_filter_summary(config: &FilterConfig, input: &Path, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {:<12}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    println!("  {:<12}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!("  {:<12}{}", s.label.apply_to("Filter"), s.method.apply_to(config.psf));
    println!("  {:<12}{}", s.label.apply_to("Sigma"), s.value.apply_to(config.sigma));
    println!();
}
