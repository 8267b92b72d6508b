use std::collections::BTreeMap;

crate::resource! {
    /// A catalog product, registered as `products`.
    ///
    /// Exercises renamed attributes and non-string attribute types; it has no
    /// relationships.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Product {
        pub name: Option<String> => attribute("product-name"),
        pub categories: Option<Vec<String>> => attribute,
        pub price: Option<f64> => attribute,
        pub in_stock: Option<i64> => attribute("in-stock"),
        /// Store name → whether the product is available there.
        pub availability: Option<BTreeMap<String, bool>> => attribute("stores-availability"),
    }
}
