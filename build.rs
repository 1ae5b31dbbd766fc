use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SILK_SDK_LIB_DIR");

    // 仅在启用 silk-sdk 特性时需要链接原生库
    if env::var_os("CARGO_FEATURE_SILK_SDK").is_none() {
        return;
    }
    if let Ok(dir) = env::var("SILK_SDK_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
}
