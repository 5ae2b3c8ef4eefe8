fn main() {
    // Only the on-device build links against ESP-IDF; host tests skip this.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
