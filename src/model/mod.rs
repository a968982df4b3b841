use serde::Deserialize;
use serde::Serialize;

// one row of the address table, as served by `address_inventory/{id}`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Address {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postcode: String,
    pub state: String,
    pub country: String,
}

// a navigation entry served by `menu_items`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub menu_item: String,
    pub href: String,
}
