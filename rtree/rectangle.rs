use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 二维点 - 设备或房间在楼层平面上的投影位置
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// 欧氏距离
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// 两个坐标是否都是有限值（非 NaN / ±Inf）
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 轴对齐边界框 - R-tree 中的最小边界矩形(MBR)
///
/// 不变量：`min_x <= max_x` 且 `min_y <= max_y`。点的边界框是退化的，
/// 最小值和最大值相等。
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "[{}, {}] x [{}, {}]", min_x, max_x, min_y, max_y)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::from_point(0.0, 0.0)
    }
}

impl BoundingBox {
    /// 创建新的边界框，坐标顺序不对时自动交换
    ///
    /// NaN 会原样保留在结果中，使 [`is_finite`](Self::is_finite) 能识别出来。
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (min_x, max_x) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (min_y, max_y) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// 创建一个点边界框（退化矩形）
    pub fn from_point(x: f64, y: f64) -> Self {
        BoundingBox {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// 以 `center` 为中心、半边长为 `half_extent` 的正方形
    ///
    /// 坐标在 f64 边缘溢出时截断到 `±f64::MAX`，有限输入总得到有限的边界框。
    pub fn around(center: &Point, half_extent: f64) -> Self {
        let clamp = |v: f64| v.clamp(-f64::MAX, f64::MAX);
        BoundingBox {
            min_x: clamp(center.x - half_extent),
            min_y: clamp(center.y - half_extent),
            max_x: clamp(center.x + half_extent),
            max_y: clamp(center.y + half_extent),
        }
    }

    /// 计算面积，点边界框为 0
    pub fn area(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// 计算周长
    pub fn perimeter(&self) -> f64 {
        2.0 * ((self.max_x - self.min_x) + (self.max_y - self.min_y))
    }

    /// 扩大到包含另一个边界框所需的周长增量
    ///
    /// 退化（零面积）的边界框面积增量总为 0，用周长增量区分它们。
    pub fn margin_enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).perimeter() - self.perimeter()
    }

    /// 计算两个边界框的并集
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// 判断是否相交，边界接触也算相交
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// 判断当前边界框是否完全包含另一个边界框
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.min_x <= point.x
            && point.x <= self.max_x
            && self.min_y <= point.y
            && point.y <= self.max_y
    }

    /// 扩大到包含另一个边界框所需的面积增量
    pub fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).area() - self.area()
    }

    /// 中心点
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// 点到边界框的最短欧氏距离，点在框内或边上时为 0
    ///
    /// KNN 搜索用它作为子树距离的下界。
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        let closest = Point::new(
            point.x.clamp(self.min_x, self.max_x),
            point.y.clamp(self.min_y, self.max_y),
        );
        point.distance(&closest)
    }

    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}
