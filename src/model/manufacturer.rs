use crate::framework::KeyCase;

crate::resource! {
    /// The maker of [`Widget`](crate::model::Widget)s. Its server speaks dasherized keys.
    pub struct Manufacturer {
        key_case: KeyCase::Dasherize,
        attributes: [name, country, founded_year],
        has_many: [widgets],
    }
}
