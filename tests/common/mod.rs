//! Scripted in-process backend shared by the manager tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pet_mall::api::{
    CartItem, MallBackend, Pagination, Product, ProductCategory, ProductPage, ProductQuery,
};
use pet_mall::MallError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Categories,
    Products(ProductQuery),
    Product(i64),
    CartItems,
    Add(i64, u32),
    Update(i64, u32),
    Remove(i64),
}

#[derive(Default)]
pub struct FakeBackend {
    pub categories: Mutex<Vec<ProductCategory>>,
    pub catalogue: Mutex<Vec<Product>>,
    pub cart: Mutex<Vec<CartItem>>,

    pub with_pagination: AtomicBool,
    pub fail_categories: AtomicBool,
    pub fail_products: AtomicBool,
    pub fail_product: AtomicBool,
    pub fail_cart_load: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_remove: AtomicBool,

    calls: Mutex<Vec<Call>>,
    update_gates: Mutex<VecDeque<oneshot::Receiver<Result<(), MallError>>>>,
    product_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    cart_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

pub fn server_error() -> MallError {
    MallError::api(500, "internal error")
}

pub fn product(id: i64, category_id: i64, price: f64, original_price: Option<f64>) -> Product {
    Product {
        id,
        name: format!("product {id}"),
        category_id,
        brand: None,
        price,
        original_price,
        stock: Some(10),
        sales: None,
        main_image: None,
        album: None,
        description: None,
        detail: None,
        status: Some(1),
        create_time: None,
        update_time: None,
    }
}

pub fn category(id: i64, name: &str) -> ProductCategory {
    ProductCategory {
        id,
        name: name.to_string(),
        parent_id: None,
        level: None,
        sort: None,
        icon: None,
        status: None,
    }
}

pub fn cart_item(id: i64, quantity: u32, price: f64, stock: u32) -> CartItem {
    let mut p = product(100 + id, 1, price, None);
    p.stock = Some(stock);
    CartItem {
        id,
        user_id: Some(1),
        product_id: p.id,
        quantity,
        create_time: None,
        update_time: None,
        product: Some(p),
    }
}

impl FakeBackend {
    pub fn with_cart(items: Vec<CartItem>) -> Self {
        let fake = Self::default();
        *fake.cart.lock().unwrap() = items;
        fake
    }

    pub fn with_catalogue(categories: Vec<ProductCategory>, products: Vec<Product>) -> Self {
        let fake = Self::default();
        *fake.categories.lock().unwrap() = categories;
        *fake.catalogue.lock().unwrap() = products;
        fake
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn product_queries(&self) -> Vec<ProductQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Products(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    /// Makes the next update calls wait for the given outcomes, in order.
    pub fn gate_updates(&self, gates: Vec<oneshot::Receiver<Result<(), MallError>>>) {
        self.update_gates.lock().unwrap().extend(gates);
    }

    /// Makes the next product list calls wait until released, in order.
    pub fn gate_products(&self, gates: Vec<oneshot::Receiver<()>>) {
        self.product_gates.lock().unwrap().extend(gates);
    }

    /// Makes the next cart list calls wait until released, in order.
    pub fn gate_cart_loads(&self, gates: Vec<oneshot::Receiver<()>>) {
        self.cart_gates.lock().unwrap().extend(gates);
    }

    /// Yields until at least `n` recorded calls satisfy `pred`.
    pub async fn wait_for(&self, n: usize, pred: impl Fn(&Call) -> bool) {
        for _ in 0..1_000 {
            if self.count(&pred) >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} matching calls, saw {:?}", self.calls());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failing(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MallBackend for FakeBackend {
    async fn categories(&self) -> Result<Vec<ProductCategory>, MallError> {
        self.record(Call::Categories);
        if Self::failing(&self.fail_categories) {
            return Err(server_error());
        }
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, MallError> {
        self.record(Call::Products(query.clone()));
        let gate = self.product_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if Self::failing(&self.fail_products) {
            return Err(MallError::Network("connection reset".into()));
        }

        let matching: Vec<Product> = self
            .catalogue
            .lock()
            .unwrap()
            .iter()
            .filter(|p| query.category_id.map_or(true, |id| p.category_id == id))
            .filter(|p| {
                query
                    .keyword
                    .as_ref()
                    .map_or(true, |k| p.name.contains(k.as_str()))
            })
            .cloned()
            .collect();

        let size = query.size.max(1) as usize;
        let start = ((query.page.max(1) - 1) as usize * size).min(matching.len());
        let end = (start + size).min(matching.len());
        let pagination = self.with_pagination.load(Ordering::SeqCst).then(|| Pagination {
            total_page: matching.len().div_ceil(size) as u32,
            current_page: query.page,
            page_pieces: size as u32,
            total_pieces: matching.len() as u64,
        });

        Ok(ProductPage {
            products: matching[start..end].to_vec(),
            pagination,
        })
    }

    async fn product(&self, id: i64) -> Result<Product, MallError> {
        self.record(Call::Product(id));
        if Self::failing(&self.fail_product) {
            return Err(MallError::api(404, format!("product {id} not found")));
        }
        self.catalogue
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| MallError::api(404, format!("product {id} not found")))
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>, MallError> {
        self.record(Call::CartItems);
        let gate = self.cart_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if Self::failing(&self.fail_cart_load) {
            return Err(MallError::Network("timed out".into()));
        }
        Ok(self.cart.lock().unwrap().clone())
    }

    async fn add_to_cart(&self, product_id: i64, quantity: u32) -> Result<(), MallError> {
        self.record(Call::Add(product_id, quantity));
        if Self::failing(&self.fail_add) {
            return Err(server_error());
        }
        let mut cart = self.cart.lock().unwrap();
        let next_id = cart.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let mut item = cart_item(next_id, quantity, 9.5, 10);
        item.product_id = product_id;
        cart.push(item);
        Ok(())
    }

    async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<(), MallError> {
        self.record(Call::Update(item_id, quantity));
        let gate = self.update_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.await
                .unwrap_or_else(|_| Err(MallError::Network("gate dropped".into())))?;
        } else if Self::failing(&self.fail_update) {
            return Err(server_error());
        }
        if let Some(item) = self.cart.lock().unwrap().iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    async fn remove_cart_item(&self, item_id: i64) -> Result<(), MallError> {
        self.record(Call::Remove(item_id));
        if Self::failing(&self.fail_remove) {
            return Err(server_error());
        }
        self.cart.lock().unwrap().retain(|i| i.id != item_id);
        Ok(())
    }
}
