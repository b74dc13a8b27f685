use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=cpp/zed_shim.cpp");
    println!("cargo:rerun-if-env-changed=ZED_DIR");
    println!("cargo:rerun-if-env-changed=CUDA_PATH");

    // Without the camera feature only the scripted tracker is built.
    if env::var_os("CARGO_FEATURE_ZED_CAMERA").is_none() {
        return;
    }

    let zed_dir = PathBuf::from(env::var("ZED_DIR").unwrap_or_else(|_| "/usr/local/zed".into()));
    let cuda_dir =
        PathBuf::from(env::var("CUDA_PATH").unwrap_or_else(|_| "/usr/local/cuda".into()));

    cc::Build::new()
        .cpp(true)
        .file("cpp/zed_shim.cpp")
        .include(zed_dir.join("include"))
        .include(cuda_dir.join("include"))
        .flag_if_supported("-std=c++17")
        .compile("zed_shim");

    println!(
        "cargo:rustc-link-search=native={}",
        zed_dir.join("lib").display()
    );
    println!(
        "cargo:rustc-link-search=native={}",
        cuda_dir.join("lib64").display()
    );
    println!("cargo:rustc-link-lib=dylib=sl_zed");
    println!("cargo:rustc-link-lib=dylib=cudart");
}
