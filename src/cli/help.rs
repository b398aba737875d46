//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if config.model.path.is_none() {
        print_first_time_help();
    } else {
        print_configured_help();
    }
}

/// Print setup guide for users without a configured model.
pub fn print_first_time_help() {
    println!("No model configured. Get started with synthscan:");
    println!();
    println!("1. Initialize configuration:");
    println!("   synthscan config init");
    println!();
    println!("2. Point model.path in the config file at the detector model");
    println!("   (an ONNX file taking a 1x512x512x3 image tensor), or pass --model.");
    println!();
    println!("3. Make ONNX Runtime available:");
    println!("   export ORT_DYLIB_PATH=/path/to/libonnxruntime.so");
    println!();
    println!("4. Classify images or posts:");
    println!("   synthscan photo.jpg");
    println!("   synthscan url https://www.instagram.com/p/<shortcode>/");
    println!();
    println!("Run 'synthscan -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: synthscan [FILES]... [OPTIONS]");
    println!("       synthscan url <LINKS>... [OPTIONS]");
    println!();
    println!("Example: synthscan ./photos --json");
    println!();
    println!("Run 'synthscan -h' for all options or 'synthscan model check' to test the model.");
}
