crate::resource! {
    /// A sellable item assembled from [`Part`](crate::model::Part)s.
    pub struct Widget {
        attributes: [name, price, serial_number],
        has_many: [parts],
        belongs_to: [manufacturer],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::RelationshipKind;

    #[test]
    fn test_widget_schema() {
        let schema = Widget::schema();
        assert_eq!(schema.type_name(), "Widget");
        assert_eq!(schema.resource_type(), "widgets");
        assert_eq!(schema.attributes(), ["name", "price", "serial_number"]);
        assert_eq!(
            schema.relationship("parts").map(|r| r.kind()),
            Some(RelationshipKind::HasMany)
        );
        assert_eq!(
            schema.relationship("manufacturer").map(|r| r.kind()),
            Some(RelationshipKind::BelongsTo)
        );
    }
}
