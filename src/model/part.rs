crate::resource! {
    /// A component of exactly one [`Widget`](crate::model::Widget).
    pub struct Part {
        attributes: [name, quantity],
        belongs_to: [widget],
    }
}
