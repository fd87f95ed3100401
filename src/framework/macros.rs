//! # Declarative Resources
//!
//! [`resource!`](crate::resource) turns a schema block into a newtype over
//! [`Resource`](crate::framework::Resource) with one accessor pair per attribute
//! and one async accessor per relationship, so no name lookup happens by hand.
//!
//! ```ignore
//! api_resource::resource! {
//!     /// A widget.
//!     pub struct Widget {
//!         attributes: [name, serial_number],
//!         has_many: [parts],
//!         belongs_to: [manufacturer],
//!     }
//! }
//!
//! let mut widget = Widget::find(&namespace, 5).await?;
//! widget.set_name("Sprocket");
//! widget.parts().await?;
//! widget.save().await?;
//! ```
//!
//! Each section ends with a comma. `key_case: <expr>,` may come first to pick
//! a [`KeyCase`](crate::framework::KeyCase) other than snake_case.

#[macro_export]
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(key_case: $case:expr,)?
            attributes: [$($attr:ident),* $(,)?],
            $(has_many: [$($many:ident),* $(,)?],)?
            $(belongs_to: [$($one:ident),* $(,)?],)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name($crate::framework::Resource);

        impl $name {
            /// Registry key of this resource kind.
            pub const TYPE_NAME: &'static str = stringify!($name);

            /// The schema to register in a namespace.
            pub fn schema() -> $crate::framework::ResourceSchema {
                $crate::framework::ResourceSchema::builder(Self::TYPE_NAME)
                    $(.key_case($case))?
                    $(.attribute(stringify!($attr)))*
                    $($(.has_many(stringify!($many)))*)?
                    $($(.belongs_to(stringify!($one)))*)?
                    .build()
            }

            pub fn class(
                namespace: &$crate::framework::Namespace,
            ) -> Result<$crate::framework::ResourceClass, $crate::framework::ResourceError> {
                namespace.class(Self::TYPE_NAME)
            }

            pub async fn create<K, V, I>(
                namespace: &$crate::framework::Namespace,
                params: I,
            ) -> Result<Self, $crate::framework::ResourceError>
            where
                I: IntoIterator<Item = (K, V)>,
                K: AsRef<str>,
                V: Into<$crate::__private::Value>,
            {
                Ok(Self(Self::class(namespace)?.create(params).await?))
            }

            pub async fn find(
                namespace: &$crate::framework::Namespace,
                id: i64,
            ) -> Result<Self, $crate::framework::ResourceError> {
                Ok(Self(Self::class(namespace)?.find(id).await?))
            }

            pub async fn filter<K, V, I>(
                namespace: &$crate::framework::Namespace,
                filters: I,
            ) -> Result<Vec<Self>, $crate::framework::ResourceError>
            where
                I: IntoIterator<Item = (K, V)>,
                K: Into<String>,
                V: Into<$crate::__private::Value>,
            {
                let records = Self::class(namespace)?.filter(filters).await?;
                Ok(records.into_iter().map(Self).collect())
            }

            pub async fn all(
                namespace: &$crate::framework::Namespace,
            ) -> Result<Vec<Self>, $crate::framework::ResourceError> {
                let records = Self::class(namespace)?.all().await?;
                Ok(records.into_iter().map(Self).collect())
            }

            pub fn from_resource(resource: $crate::framework::Resource) -> Self {
                Self(resource)
            }

            pub fn into_inner(self) -> $crate::framework::Resource {
                self.0
            }

            $(
                pub fn $attr(&self) -> Option<&$crate::__private::Value> {
                    self.0.get(stringify!($attr))
                }
            )*

            $crate::__private::paste! {
                $(
                    pub fn [<set_ $attr>](&mut self, value: impl Into<$crate::__private::Value>) {
                        self.0.set(stringify!($attr), value)
                    }
                )*
            }

            $($(
                pub async fn $many(
                    &mut self,
                ) -> Result<&mut $crate::framework::HasMany, $crate::framework::ResourceError> {
                    self.0.has_many(stringify!($many)).await
                }
            )*)?

            $($(
                pub async fn $one(
                    &mut self,
                ) -> Result<&mut $crate::framework::Resource, $crate::framework::ResourceError> {
                    self.0.belongs_to(stringify!($one)).await
                }
            )*)?
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::framework::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}
