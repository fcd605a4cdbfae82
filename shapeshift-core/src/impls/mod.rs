mod boxed;
mod btreemap;
mod hashmap;
mod option;
mod scalar;
mod vec;
