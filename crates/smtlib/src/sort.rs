/// SMT-LIB sort (type) representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Mathematical integer sort
    Int,
    /// Array sort: `(Array index_sort element_sort)`
    Array(Box<Sort>, Box<Sort>),
}

impl Sort {
    /// The sort the verifier uses for program arrays: `(Array Int Int)`.
    pub fn int_array() -> Self {
        Sort::Array(Box::new(Sort::Int), Box::new(Sort::Int))
    }
}
