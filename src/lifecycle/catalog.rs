use crate::clients::{HttpConfig, HttpTransport};
use crate::framework::{Namespace, ResourceError, Transport};
use crate::model::{self, Manufacturer, Part, Widget};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Entry point wiring the sample model kinds to one transport.
///
/// `Catalog` is responsible for:
/// - **Registration**: every kind in [`model`] lands in a single [`Namespace`]
/// - **Validation**: relationship targets are checked once, at construction
/// - **Transport binding**: HTTP from config, or any [`Transport`] for tests
///
/// # Example
///
/// ```ignore
/// let catalog = Catalog::connect(&HttpConfig::new("https://api.example.com"))?;
///
/// let mut widget = catalog.widget(5).await?;
/// widget.set_name("Sprocket");
/// widget.save().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    namespace: Namespace,
}

impl Catalog {
    /// Registers every model kind against `transport`.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self, ResourceError> {
        let namespace = model::schemas()
            .into_iter()
            .fold(Namespace::builder(transport), |builder, schema| {
                builder.register(schema)
            })
            .build()?;
        info!(?namespace, "Catalog ready");
        Ok(Self { namespace })
    }

    /// Catalog over HTTP.
    pub fn connect(config: &HttpConfig) -> Result<Self, ResourceError> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(Arc::new(transport))
    }

    /// Catalog over HTTP, configured from `API_RESOURCE_*` variables.
    pub fn from_env() -> Result<Self, ResourceError> {
        Self::connect(&HttpConfig::from_env()?)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[instrument(skip(self))]
    pub async fn widget(&self, id: i64) -> Result<Widget, ResourceError> {
        Widget::find(&self.namespace, id).await
    }

    pub async fn widgets(&self) -> Result<Vec<Widget>, ResourceError> {
        Widget::all(&self.namespace).await
    }

    #[instrument(skip(self))]
    pub async fn create_widget(
        &self,
        name: &str,
        serial_number: &str,
    ) -> Result<Widget, ResourceError> {
        Widget::create(
            &self.namespace,
            [("name", Value::from(name)), ("serial_number", Value::from(serial_number))],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn part(&self, id: i64) -> Result<Part, ResourceError> {
        Part::find(&self.namespace, id).await
    }

    #[instrument(skip(self))]
    pub async fn manufacturer(&self, id: i64) -> Result<Manufacturer, ResourceError> {
        Manufacturer::find(&self.namespace, id).await
    }
}
