fn main() {
    // Exposes package version, git hash and build time to the binary
    built::write_built_file().expect("Failed to acquire build-time information");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}
