//! In-memory storefront implementing [`BrowserDriver`].
//!
//! A deterministic stand-in for a real browser pointed at the shop: product
//! grid with sidebar filters and search, categories menu, product pages,
//! sign-in, favorites with server-side duplicate rejection, a cart with the
//! tool + rental bundle discount, and the checkout wizard. Every scenario
//! can run against it end to end.
//!
//! The page is re-rendered from state on every query, so element handles
//! behave like real DOM snapshots: they go stale after a navigation.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::driver::{BrowserDriver, ClickOptions, ElementHandle};
use crate::fixture::{Credentials, TestData};
use crate::harness::SessionFactory;
use crate::locator::Selector;
use crate::network::{HttpMethod, InterceptId, InterceptSpec, InterceptedResponse};
use crate::page_object::UrlMatcher;
use crate::price::Price;
use crate::result::{ProbeError, ProbeResult};

/// Category whose items form a bundle with any other item
pub const RENTAL_CATEGORY: &str = "Rentals";

/// Products shown on one grid page
pub const GRID_PAGE_SIZE: usize = 9;

const PAYMENT_METHODS: [(&str, &str); 5] = [
    ("Bank Transfer", "bank-transfer"),
    ("Cash on Delivery", "cash-on-delivery"),
    ("Credit Card", "credit-card"),
    ("Buy Now Pay Later", "buy-now-pay-later"),
    ("Gift Card", "gift-card"),
];

/// A catalog item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProduct {
    /// Product id used in `/product/:id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Category label
    pub category: String,
    /// Unit price
    pub price: Price,
}

impl MockProduct {
    /// Create a product
    #[must_use]
    pub fn new(id: &str, name: &str, category: &str, cents: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price: Price::from_cents(cents),
        }
    }

    fn is_rental(&self) -> bool {
        self.category.eq_ignore_ascii_case(RENTAL_CATEGORY)
    }
}

/// The catalog the practice shop ships with (prices in cents)
#[must_use]
pub fn default_catalog() -> Vec<MockProduct> {
    [
        ("01", "Combination Pliers", "Pliers", 1415),
        ("02", "Pliers", "Pliers", 1201),
        ("03", "Bolt Cutters", "Pliers", 4841),
        ("04", "Long Nose Pliers", "Pliers", 1424),
        ("05", "Claw Hammer with Shock Reduction Grip", "Hammer", 1341),
        ("06", "Hammer", "Hammer", 1258),
        ("07", "Thor Hammer", "Hammer", 1114),
        ("08", "Sledgehammer", "Hammer", 1775),
        ("09", "Wood Saw", "Hand Saw", 1218),
        ("10", "Claw Hammer", "Hammer", 1135),
        ("11", "Wood Carving Chisels", "Chisels", 4523),
        ("12", "Excavator", RENTAL_CATEGORY, 13650),
        ("13", "Bulldozer", RENTAL_CATEGORY, 14750),
        ("14", "Crane", RENTAL_CATEGORY, 15300),
    ]
    .into_iter()
    .map(|(id, name, category, cents)| MockProduct::new(id, name, category, cents))
    .collect()
}

fn slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    Blank,
    Home,
    Login,
    Account,
    Product(String),
    Category(String),
    Checkout(u8),
    OrderPlaced,
    Favorites,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    Nothing,
    Goto(View),
    ToggleMenu,
    ToggleCategories,
    SubmitLogin,
    AddToCart(String),
    AddFavorite(String),
    DeleteFavorite(String),
    ToggleFilter(String),
    SubmitSearch,
    Proceed(u8),
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
    Search,
    Payment,
}

/// One rendered element: its snapshot, the selectors it answers to, and
/// what clicking it does
#[derive(Debug, Clone)]
struct Node {
    handle: ElementHandle,
    aliases: &'static [&'static str],
    label: Option<String>,
    effect: Effect,
    field: Option<Field>,
}

impl Node {
    fn new(id: impl Into<String>, tag: &str, aliases: &'static [&'static str]) -> Self {
        Self {
            handle: ElementHandle::new(id, tag),
            aliases,
            label: None,
            effect: Effect::Nothing,
            field: None,
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.handle = self.handle.with_text(text);
        self
    }

    fn value(mut self, value: impl Into<String>) -> Self {
        self.handle = self.handle.with_value(value);
        self
    }

    fn attr(mut self, name: &str, value: &str) -> Self {
        self.handle = self.handle.with_attribute(name, value);
        self
    }

    fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn on_click(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    const fn field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    fn covered(mut self) -> Self {
        self.handle = self.handle.covered();
        self
    }

    fn matches(&self, selector: &Selector) -> bool {
        let css = selector.css_query();
        if css != "*" && !self.aliases.contains(&css.as_str()) {
            return false;
        }
        selector.text_filter().map_or(true, |text| {
            self.handle.text().contains(text)
                || self.label.as_deref().is_some_and(|l| l.contains(text))
        })
    }
}

type Capture = (InterceptId, InterceptSpec, Vec<InterceptedResponse>);

/// In-memory storefront driver
#[derive(Debug)]
pub struct MockStorefront {
    base: String,
    catalog: Vec<MockProduct>,
    credentials: Credentials,
    bundle_multiplier: Decimal,
    render_delay: usize,
    pending_renders: AtomicUsize,
    grid_refresh_delay: usize,
    pending_grid: AtomicUsize,
    previous_grid: Vec<MockProduct>,

    view: View,
    search_term: Option<String>,
    checked: BTreeSet<String>,
    menu_open: bool,
    categories_open: bool,
    login_error: bool,
    email_input: String,
    password_input: String,
    search_input: String,
    payment: Option<&'static str>,

    authenticated: bool,
    cart: Vec<(String, u32)>,
    favorites: Vec<String>,
    orders: usize,

    captures: Vec<Capture>,
    next_intercept: u64,
    closed: bool,
}

impl MockStorefront {
    /// Storefront at the fixture's URL accepting the fixture's credentials
    #[must_use]
    pub fn new(data: &TestData) -> Self {
        Self {
            base: data.home_page_url.trim_end_matches('/').to_string(),
            catalog: default_catalog(),
            credentials: data.login.clone(),
            bundle_multiplier: Decimal::new(2, 1),
            render_delay: 0,
            pending_renders: AtomicUsize::new(0),
            grid_refresh_delay: 0,
            pending_grid: AtomicUsize::new(0),
            previous_grid: Vec::new(),
            view: View::Blank,
            search_term: None,
            checked: BTreeSet::new(),
            menu_open: false,
            categories_open: false,
            login_error: false,
            email_input: String::new(),
            password_input: String::new(),
            search_input: String::new(),
            payment: None,
            authenticated: false,
            cart: Vec::new(),
            favorites: Vec::new(),
            orders: 0,
            captures: Vec::new(),
            next_intercept: 0,
            closed: false,
        }
    }

    /// Replace the catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<MockProduct>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Factor the cart applies when a rental is bundled with another item
    #[must_use]
    pub const fn with_bundle_multiplier(mut self, multiplier: Decimal) -> Self {
        self.bundle_multiplier = multiplier;
        self
    }

    /// Make every page render empty for the first `queries` queries after
    /// a navigation
    #[must_use]
    pub const fn with_render_delay(mut self, queries: usize) -> Self {
        self.render_delay = queries;
        self
    }

    /// Keep showing the previous product grid for the first `queries`
    /// queries after a search, a filter change or a category switch
    #[must_use]
    pub const fn with_grid_refresh_delay(mut self, queries: usize) -> Self {
        self.grid_refresh_delay = queries;
        self
    }

    /// Start signed in
    #[must_use]
    pub const fn signed_in(mut self) -> Self {
        self.authenticated = true;
        self
    }

    /// Whether the account is signed in
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.authenticated
    }

    /// Cart lines as (product name, quantity)
    #[must_use]
    pub fn cart_lines(&self) -> Vec<(String, u32)> {
        self.cart
            .iter()
            .filter_map(|(id, qty)| self.product(id).map(|p| (p.name.clone(), *qty)))
            .collect()
    }

    /// Favorite product names
    #[must_use]
    pub fn favorite_names(&self) -> Vec<String> {
        self.favorites
            .iter()
            .filter_map(|id| self.product(id).map(|p| p.name.clone()))
            .collect()
    }

    /// Orders placed through checkout
    #[must_use]
    pub const fn orders_placed(&self) -> usize {
        self.orders
    }

    fn product(&self, id: &str) -> Option<&MockProduct> {
        self.catalog.iter().find(|p| p.id == id)
    }

    fn api_url(&self, path: &str) -> String {
        let api = self.base.replacen("://", "://api.", 1);
        format!("{api}/{}", path.trim_start_matches('/'))
    }

    fn route(&self) -> String {
        let route = match &self.view {
            View::Blank => return "about:blank".to_string(),
            View::Home => self
                .search_term
                .as_ref()
                .map_or_else(|| "/".to_string(), |q| format!("/?q={q}")),
            View::Login => "/auth/login".to_string(),
            View::Account => "/account".to_string(),
            View::Product(id) => format!("/product/{id}"),
            View::Category(name) => format!("/category/{name}"),
            View::Checkout(_) | View::OrderPlaced => "/checkout".to_string(),
            View::Favorites => "/account/favorites".to_string(),
        };
        format!("{}{route}", self.base)
    }

    /// Cart total as displayed, with the bundle discount applied
    pub fn cart_total(&self) -> ProbeResult<Price> {
        let mut has_rental = false;
        let mut has_tool = false;
        let lines = self
            .cart
            .iter()
            .filter_map(|(id, qty)| self.product(id).map(|p| (p, *qty)))
            .map(|(p, qty)| {
                if p.is_rental() {
                    has_rental = true;
                } else {
                    has_tool = true;
                }
                p.price.scaled(Decimal::from(qty))
            })
            .collect::<ProbeResult<Vec<Price>>>()?;
        let sum = Price::total(lines)?;
        if has_rental && has_tool {
            sum.scaled(self.bundle_multiplier)
        } else {
            Ok(sum)
        }
    }

    fn grid_products(&self) -> Vec<&MockProduct> {
        let tools = self.catalog.iter().filter(|p| !p.is_rental());
        match &self.view {
            View::Category(name) => self
                .catalog
                .iter()
                .filter(|p| slug(&p.category) == *name)
                .collect(),
            _ => {
                if let Some(term) = &self.search_term {
                    let term = term.to_lowercase();
                    tools
                        .filter(|p| p.name.to_lowercase().contains(&term))
                        .collect()
                } else if self.checked.is_empty() {
                    tools.take(GRID_PAGE_SIZE).collect()
                } else {
                    tools.filter(|p| self.checked.contains(&p.category)).collect()
                }
            }
        }
    }

    fn categories(&self, include_rentals: bool) -> Vec<String> {
        let mut seen = Vec::new();
        for product in &self.catalog {
            if (include_rentals || !product.is_rental()) && !seen.contains(&product.category) {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    fn render(&self) -> Vec<Node> {
        self.render_page(false)
    }

    fn render_page(&self, stale_grid: bool) -> Vec<Node> {
        if self.view == View::Blank {
            return Vec::new();
        }

        let mut nodes = vec![
            Node::new("nav-home", "a", &["[data-test='nav-home']"])
                .text("Home")
                .on_click(Effect::Goto(View::Home)),
            Node::new("logo-0", "path", &[".st3"])
                .covered()
                .on_click(Effect::Goto(View::Home)),
            Node::new("logo-1", "path", &[".st3"])
                .covered()
                .on_click(Effect::Goto(View::Home)),
            Node::new("nav-categories", "a", &["[data-test='nav-categories']"])
                .text("Categories")
                .on_click(Effect::ToggleCategories),
        ];

        if self.categories_open {
            for (i, category) in self.categories(true).into_iter().enumerate() {
                nodes.push(
                    Node::new(format!("category-{i}"), "a", &[".dropdown-menu a"])
                        .on_click(Effect::Goto(View::Category(slug(&category))))
                        .text(category),
                );
            }
        }

        if !self.cart.is_empty() {
            let count: u32 = self.cart.iter().map(|(_, q)| q).sum();
            nodes.push(
                Node::new(
                    "nav-cart",
                    "a",
                    &["a[data-test='nav-cart']", "[data-test='nav-cart']"],
                )
                .text(count.to_string())
                .covered()
                .on_click(Effect::Goto(View::Checkout(1))),
            );
        }

        if self.authenticated {
            nodes.push(
                Node::new("nav-menu", "a", &["[data-test='nav-menu']"])
                    .text("Jane Doe")
                    .covered()
                    .on_click(Effect::ToggleMenu),
            );
            if self.menu_open {
                nodes.push(
                    Node::new("nav-my-favorites", "a", &["[data-test='nav-my-favorites']"])
                        .text("My favorites")
                        .on_click(Effect::Goto(View::Favorites)),
                );
            }
        } else {
            nodes.push(
                Node::new("nav-sign-in", "a", &["[data-test='nav-sign-in']"])
                    .text("Sign in")
                    .on_click(Effect::Goto(View::Login)),
            );
        }

        match &self.view {
            View::Blank => {}
            View::Home | View::Category(_) => self.render_grid(stale_grid, &mut nodes),
            View::Login => self.render_login(&mut nodes),
            View::Account => nodes.push(Node::new("account-title", "h1", &["h1"]).text("My account")),
            View::Product(id) => self.render_product(id, &mut nodes),
            View::Checkout(step) => self.render_checkout(*step, &mut nodes),
            View::OrderPlaced => nodes.push(
                Node::new(
                    "payment-success",
                    "div",
                    &["[data-test='payment-success-message']"],
                )
                .text("Payment was successful"),
            ),
            View::Favorites => self.render_favorites(&mut nodes),
        }

        nodes
    }

    fn render_grid(&self, stale: bool, nodes: &mut Vec<Node>) {
        if self.view == View::Home {
            for category in self.categories(false) {
                let mut checkbox = Node::new(
                    format!("filter-{}", slug(&category)),
                    "input",
                    &["label input[type='checkbox']", "input[type='checkbox']"],
                )
                .attr("type", "checkbox")
                .on_click(Effect::ToggleFilter(category.clone()));
                if self.checked.contains(&category) {
                    checkbox = checkbox.attr("checked", "true");
                }
                nodes.push(checkbox.label(format!(" {category}")));
            }
            nodes.push(
                Node::new("search-query", "input", &["input#search-query", "#search-query"])
                    .value(self.search_input.clone())
                    .field(Field::Search),
            );
            nodes.push(
                Node::new(
                    "search-submit",
                    "button",
                    &["button[data-test=search-submit]", "[data-test='search-submit']"],
                )
                .text("Search")
                .on_click(Effect::SubmitSearch),
            );
        }

        let products = if stale {
            self.previous_grid.iter().collect()
        } else {
            self.grid_products()
        };
        for product in products {
            let open = Effect::Goto(View::Product(product.id.clone()));
            nodes.push(
                Node::new(format!("card-{}", product.id), "a", &[".col-md-9 .container a"])
                    .text(format!("{} {}", product.name, product.price))
                    .on_click(open.clone()),
            );
            nodes.push(
                Node::new(format!("card-img-{}", product.id), "img", &[".card-img-top"])
                    .attr("alt", &product.name)
                    .on_click(open.clone()),
            );
            nodes.push(
                Node::new(format!("card-body-{}", product.id), "div", &[".card-body"])
                    .text(format!("{} {}", product.name, product.price))
                    .on_click(open),
            );
            nodes.push(
                Node::new(
                    format!("card-name-{}", product.id),
                    "h5",
                    &["h5[data-test=product-name]", "[data-test='product-name']"],
                )
                .text(product.name.clone()),
            );
        }
    }

    fn render_login(&self, nodes: &mut Vec<Node>) {
        nodes.push(
            Node::new("email", "input", &["#email"])
                .value(self.email_input.clone())
                .field(Field::Email),
        );
        nodes.push(
            Node::new("password", "input", &["#password"])
                .value(self.password_input.clone())
                .field(Field::Password),
        );
        nodes.push(
            Node::new("login-submit", "input", &[".btnSubmit"])
                .value("Login")
                .on_click(Effect::SubmitLogin),
        );
        if self.login_error {
            nodes.push(
                Node::new("login-error", "div", &[".help-block", "[data-test='login-error']"])
                    .text("Invalid email or password"),
            );
        }
    }

    fn render_product(&self, id: &str, nodes: &mut Vec<Node>) {
        let Some(product) = self.product(id) else {
            nodes.push(Node::new("not-found", "h1", &["h1"]).text("Page not found"));
            return;
        };
        nodes.push(
            Node::new("product-title", "h1", &["[data-test='product-name']", "h1"])
                .text(product.name.clone()),
        );
        nodes.push(
            Node::new("product-category", "span", &["span[aria-label='category']"])
                .attr("aria-label", "category")
                .text(product.category.clone()),
        );
        nodes.push(
            Node::new("unit-price", "span", &["[data-test='unit-price']"])
                .text(product.price.amount().to_string()),
        );
        nodes.push(
            Node::new("btn-add-to-cart", "button", &["#btn-add-to-cart"])
                .text("Add to cart")
                .on_click(Effect::AddToCart(product.id.clone())),
        );
        nodes.push(
            Node::new("btn-add-to-favorites", "button", &["#btn-add-to-favorites"])
                .text("Add to favourites")
                .on_click(Effect::AddFavorite(product.id.clone())),
        );
    }

    fn render_checkout(&self, step: u8, nodes: &mut Vec<Node>) {
        match step {
            1 => {
                for (i, (id, qty)) in self.cart.iter().enumerate() {
                    let Some(product) = self.product(id) else {
                        continue;
                    };
                    nodes.push(
                        Node::new(
                            format!("qty-{i}"),
                            "input",
                            &["input[data-test='product-quantity']", ".quantity"],
                        )
                        .value(qty.to_string()),
                    );
                    nodes.push(
                        Node::new(format!("title-{i}"), "span", &["[data-test='product-title']"])
                            .text(product.name.clone()),
                    );
                    nodes.push(
                        Node::new(format!("price-{i}"), "span", &["[data-test='product-price']"])
                            .text(product.price.to_string()),
                    );
                }
                nodes.push(
                    Node::new("cart-total", "td", &["[data-test='cart-total']"])
                        .text(
                            self.cart_total()
                                .map_or_else(|e| e.to_string(), |total| total.to_string()),
                        ),
                );
                if !self.cart.is_empty() {
                    nodes.push(proceed(1));
                }
            }
            2 => {
                if self.authenticated {
                    nodes.push(
                        Node::new("signed-in-note", "p", &["p"])
                            .text("You are already logged in. You can proceed to checkout."),
                    );
                    nodes.push(proceed(2));
                }
            }
            3 => nodes.push(proceed(3)),
            _ => {
                let value = self.payment.unwrap_or_default();
                nodes.push(
                    Node::new("payment-method", "select", &["select#payment-method", "#payment-method"])
                        .value(value)
                        .field(Field::Payment),
                );
                nodes.push(
                    Node::new("finish", "button", &["[data-test='finish']"])
                        .text("Confirm")
                        .on_click(Effect::Finish),
                );
            }
        }
    }

    fn render_favorites(&self, nodes: &mut Vec<Node>) {
        nodes.push(Node::new("favorites-title", "h1", &["h1"]).text("Favorites"));
        for id in &self.favorites {
            let Some(product) = self.product(id) else {
                continue;
            };
            nodes.push(
                Node::new(format!("fav-name-{id}"), "h5", &["[data-test='product-name']"])
                    .text(product.name.clone()),
            );
            nodes.push(
                Node::new(format!("fav-delete-{id}"), "button", &["[data-test='delete']"])
                    .text("Delete")
                    .on_click(Effect::DeleteFavorite(id.clone())),
            );
        }
    }

    fn navigate(&mut self, view: View) {
        debug!(from = ?self.view, to = ?view, "mock navigation");
        let before = self.shown_grid();
        if view == View::Home {
            self.search_term = None;
            self.search_input.clear();
            self.checked.clear();
        }
        if view == View::Login {
            self.email_input.clear();
            self.password_input.clear();
            self.login_error = false;
        }
        self.view = view;
        self.menu_open = false;
        self.categories_open = false;
        self.pending_renders.store(self.render_delay, Ordering::SeqCst);

        match &self.view {
            View::Home => self.list_products("/products?page=1"),
            View::Category(name) => {
                let path = format!("/products?by_category={name}");
                self.refresh_grid(before);
                self.list_products(&path);
            }
            _ => {}
        }
    }

    /// Products currently on screen; empty off the grid pages
    fn shown_grid(&self) -> Vec<MockProduct> {
        match self.view {
            View::Home | View::Category(_) => self.grid_products().into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn refresh_grid(&mut self, before: Vec<MockProduct>) {
        self.previous_grid = before;
        self.pending_grid.store(self.grid_refresh_delay, Ordering::SeqCst);
    }

    fn list_products(&mut self, path: &str) {
        let data: Vec<serde_json::Value> = self
            .grid_products()
            .iter()
            .map(|p| json!({"id": p.id, "name": p.name, "price": p.price.amount()}))
            .collect();
        self.record(HttpMethod::Get, path, 200, json!({"data": data}));
    }

    fn record(&mut self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        let url = self.api_url(path);
        debug!(%method, url, status, "mock api call");
        for (_, spec, captured) in &mut self.captures {
            if spec.matches(method, &url) {
                captured.push(InterceptedResponse {
                    url: url.clone(),
                    method,
                    status,
                    body: body.clone(),
                });
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Nothing => {}
            Effect::Goto(View::Favorites) if !self.authenticated => self.navigate(View::Login),
            Effect::Goto(view) => self.navigate(view),
            Effect::ToggleMenu => self.menu_open = !self.menu_open,
            Effect::ToggleCategories => self.categories_open = !self.categories_open,
            Effect::SubmitLogin => {
                let ok = self.email_input == self.credentials.email
                    && self.password_input == self.credentials.password;
                if ok {
                    self.record(HttpMethod::Post, "/users/login", 200, json!({"token_type": "bearer"}));
                    self.authenticated = true;
                    self.navigate(View::Account);
                } else {
                    self.record(HttpMethod::Post, "/users/login", 401, json!({"error": "Unauthorized"}));
                    self.login_error = true;
                    self.password_input.clear();
                }
            }
            Effect::AddToCart(id) => {
                match self.cart.iter_mut().find(|(line, _)| *line == id) {
                    Some((_, qty)) => *qty += 1,
                    None => self.cart.push((id.clone(), 1)),
                }
                self.record(HttpMethod::Post, "/carts", 200, json!({"result": "item added or updated", "product_id": id}));
            }
            Effect::AddFavorite(id) => {
                if !self.authenticated {
                    self.record(HttpMethod::Post, "/favorites", 401, json!({"message": "Unauthorized"}));
                } else if self.favorites.contains(&id) {
                    self.record(HttpMethod::Post, "/favorites", 422, json!({"message": "Duplicate Entry"}));
                } else {
                    self.favorites.push(id.clone());
                    self.record(HttpMethod::Post, "/favorites", 201, json!({"id": format!("fav-{id}"), "product_id": id}));
                }
            }
            Effect::DeleteFavorite(id) => {
                self.favorites.retain(|f| *f != id);
                self.record(HttpMethod::Delete, &format!("/favorites/fav-{id}"), 204, serde_json::Value::Null);
            }
            Effect::ToggleFilter(category) => {
                let before = self.shown_grid();
                if !self.checked.remove(&category) {
                    let _ = self.checked.insert(category);
                }
                let slugs: Vec<String> = self.checked.iter().map(|c| slug(c)).collect();
                self.refresh_grid(before);
                self.list_products(&format!("/products?by_category={}", slugs.join(",")));
            }
            Effect::SubmitSearch => {
                let before = self.shown_grid();
                let term = self.search_input.trim().to_string();
                self.search_term = (!term.is_empty()).then_some(term.clone());
                self.refresh_grid(before);
                self.list_products(&format!("/products/search?q={term}"));
            }
            Effect::Proceed(step) => self.navigate(View::Checkout(step + 1)),
            Effect::Finish => {
                if self.payment.is_some() {
                    self.record(HttpMethod::Post, "/invoices", 201, json!({"invoice_number": format!("INV-{:04}", self.orders + 1)}));
                    self.cart.clear();
                    self.orders += 1;
                    self.payment = None;
                    self.navigate(View::OrderPlaced);
                }
            }
        }
    }

    fn node(&self, element: &ElementHandle) -> ProbeResult<Node> {
        self.render()
            .into_iter()
            .find(|n| n.handle.id == element.id)
            .ok_or_else(|| ProbeError::driver(format!("stale element {}", element.id)))
    }

    fn ensure_open(&self) -> ProbeResult<()> {
        if self.closed {
            Err(ProbeError::driver("browser closed"))
        } else {
            Ok(())
        }
    }
}

/// Consume one pending query from `counter`; false once it reaches zero
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn proceed(step: u8) -> Node {
    let aliases: &'static [&'static str] = match step {
        1 => &["[data-test='proceed-1']"],
        2 => &["[data-test='proceed-2']"],
        _ => &["[data-test='proceed-3']"],
    };
    Node::new(format!("proceed-{step}"), "button", aliases)
        .text("Proceed to checkout")
        .on_click(Effect::Proceed(step))
}

#[async_trait]
impl BrowserDriver for MockStorefront {
    async fn visit(&mut self, url: &str) -> ProbeResult<()> {
        self.ensure_open()?;
        if !url.starts_with(&self.base) {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: format!("mock only serves {}", self.base),
            });
        }

        let route = UrlMatcher::route(url);
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
        let view = match segments.as_slice() {
            [] => View::Home,
            ["auth", "login"] => View::Login,
            ["account"] if self.authenticated => View::Account,
            ["account", "favorites"] if self.authenticated => View::Favorites,
            ["account"] | ["account", "favorites"] => View::Login,
            ["product", id] => View::Product((*id).to_string()),
            ["category", name] => View::Category((*name).to_string()),
            ["checkout"] => View::Checkout(1),
            _ => {
                return Err(ProbeError::Navigation {
                    url: url.to_string(),
                    message: "404".to_string(),
                })
            }
        };
        self.navigate(view);
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        self.ensure_open()?;
        Ok(self.route())
    }

    async fn query_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        if take_one(&self.pending_renders) {
            return Ok(Vec::new());
        }
        let stale_grid = take_one(&self.pending_grid);
        Ok(self
            .render_page(stale_grid)
            .into_iter()
            .filter(|n| n.matches(selector))
            .map(|n| n.handle)
            .collect())
    }

    async fn click(&mut self, element: &ElementHandle, options: ClickOptions) -> ProbeResult<()> {
        self.ensure_open()?;
        let node = self.node(element)?;
        if !options.force && !node.handle.is_actionable() {
            return Err(ProbeError::driver(format!(
                "{} is covered by another element",
                element.id
            )));
        }
        self.apply(node.effect);
        Ok(())
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.ensure_open()?;
        let node = self.node(element)?;
        let target = match node.field {
            Some(Field::Email) => &mut self.email_input,
            Some(Field::Password) => &mut self.password_input,
            Some(Field::Search) => &mut self.search_input,
            Some(Field::Payment) | None => {
                return Err(ProbeError::driver(format!("cannot type into {}", element.id)))
            }
        };
        target.push_str(text);
        Ok(())
    }

    async fn select_option(&mut self, element: &ElementHandle, label: &str) -> ProbeResult<()> {
        self.ensure_open()?;
        let node = self.node(element)?;
        if node.field != Some(Field::Payment) {
            return Err(ProbeError::driver(format!("{} is not a <select>", element.id)));
        }
        let (_, value) = PAYMENT_METHODS
            .iter()
            .find(|(l, _)| *l == label)
            .ok_or_else(|| ProbeError::driver(format!("no option labelled {label:?}")))?;
        self.payment = Some(value);
        Ok(())
    }

    async fn intercept(&mut self, spec: &InterceptSpec) -> ProbeResult<InterceptId> {
        self.ensure_open()?;
        self.next_intercept += 1;
        let id = InterceptId(self.next_intercept);
        self.captures.push((id, spec.clone(), Vec::new()));
        Ok(id)
    }

    async fn take_responses(&mut self, id: InterceptId) -> ProbeResult<Vec<InterceptedResponse>> {
        self.captures
            .iter_mut()
            .find(|(capture_id, _, _)| *capture_id == id)
            .map(|(_, _, captured)| std::mem::take(captured))
            .ok_or_else(|| ProbeError::driver(format!("unknown intercept {}", id.0)))
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Hands out a fresh [`MockStorefront`] per scenario
#[derive(Debug, Clone)]
pub struct MockSessionFactory {
    data: TestData,
    bundle_multiplier: Decimal,
}

impl MockSessionFactory {
    /// Factory for storefronts matching `data`
    #[must_use]
    pub fn new(data: &TestData) -> Self {
        Self {
            data: data.clone(),
            bundle_multiplier: Decimal::new(2, 1),
        }
    }

    /// Bundle factor every storefront applies
    #[must_use]
    pub const fn with_bundle_multiplier(mut self, multiplier: Decimal) -> Self {
        self.bundle_multiplier = multiplier;
        self
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    type Driver = MockStorefront;

    async fn create(&self) -> ProbeResult<MockStorefront> {
        Ok(MockStorefront::new(&self.data).with_bundle_multiplier(self.bundle_multiplier))
    }
}
